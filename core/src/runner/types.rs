use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Signal {
    Kill,
    Term,
}

#[derive(Debug, Clone, Default)]
pub struct RunnerStartArgs {
    pub cmd: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A fatal line was seen in the renderer output.
    Render,
    /// The renderer exited with a code that counts as failure.
    ExitCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum TaskVerdict {
    Succeeded { note: Option<String> },
    Failed { reason: String, kind: FailureKind },
}

impl TaskVerdict {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskVerdict::Succeeded { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub verdict: TaskVerdict,
    /// `None` when the renderer was killed before it exited on its own.
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
    pub progress_percent: f64,
    pub finished_frames: u32,
    pub status_message: String,
    pub lines: u64,
    pub stdout_tail: String,
    pub stderr_tail: String,
}
