pub use mayacmd_core::runner::{RunOutcome, RunnerPlugin, RunnerSession, RunnerStartArgs, Signal};

pub mod process;
pub mod replay;

pub use process::ProcessRunnerPlugin;
pub use replay::ReplayRunnerPlugin;
