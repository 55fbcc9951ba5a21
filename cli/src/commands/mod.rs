pub mod args;
pub mod cli;
pub mod render;
pub mod replay;
