mod abort;
mod io_pump;
mod output;
mod runtime;
pub mod types;

mod run;
mod traits;

pub use io_pump::LineStream;
pub use output::{ChannelSink, EventsSink, FanoutSink, LogSink, ReportEvent, ReportSink};
pub use run::{run_task, RunTaskArgs};
pub use traits::{RunnerPlugin, RunnerSession};
pub use types::{FailureKind, RunOutcome, RunnerStartArgs, Signal, TaskReport, TaskVerdict};
