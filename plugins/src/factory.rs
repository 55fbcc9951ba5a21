use std::path::PathBuf;

use mayacmd_core::runner::RunnerPlugin;

use crate::runner::{ProcessRunnerPlugin, ReplayRunnerPlugin};

/// Where renderer output comes from.
#[derive(Debug, Clone)]
pub enum RunnerSpec {
    Process,
    Replay { log_file: PathBuf, exit_code: i32 },
}

pub fn build_runner(spec: &RunnerSpec) -> Box<dyn RunnerPlugin> {
    match spec {
        RunnerSpec::Process => Box::new(ProcessRunnerPlugin::new()),
        RunnerSpec::Replay {
            log_file,
            exit_code,
        } => Box::new(ReplayRunnerPlugin::new(log_file.clone(), *exit_code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_the_requested_runner() {
        assert_eq!(build_runner(&RunnerSpec::Process).name(), "process");
        let replay = RunnerSpec::Replay {
            log_file: "render.log".into(),
            exit_code: 0,
        };
        assert_eq!(build_runner(&replay).name(), "replay");
    }
}
