//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `mayacmd_core::api` instead of reaching into internal modules.

pub use crate::args::{build_command_line, parse_devices, split_options, CommandLine};
pub use crate::config::{
    load_default, load_from_path, AppConfig, ControlConfig, EventsOutConfig, LoggingConfig,
    PluginConfig,
};
pub use crate::dispatch::{DispatchOptions, Effect, Effects, LineDispatcher, ProgressState};
pub use crate::env::session_environment;
pub use crate::error::{CliError, ConfigError, RunnerError};
pub use crate::events_out::{start_events_out, EventsOutTx};
pub use crate::exit::{classify, ExitOutcome};
pub use crate::job::{FrameRange, JobSettings, MayaVersion, PluginInfo, TaskContext};
pub use crate::matcher::{Action, RuleSet};
pub use crate::renderer::RendererKind;
pub use crate::runner::{
    run_task, ChannelSink, EventsSink, FailureKind, FanoutSink, LineStream, LogSink, ReportEvent,
    ReportSink, RunOutcome, RunTaskArgs, RunnerPlugin, RunnerSession, RunnerStartArgs, Signal,
    TaskReport, TaskVerdict,
};
