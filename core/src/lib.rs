pub mod api;
pub mod args;
pub mod config;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod events_out;
pub mod exit;
pub mod job;
pub mod matcher;
pub mod renderer;
pub mod runner;
pub mod util;
