pub mod helpers;
pub mod writer;

pub use crate::config::EventsOutConfig;
pub use helpers::write_event;
pub use writer::{start_events_out, EventsOutTx};
