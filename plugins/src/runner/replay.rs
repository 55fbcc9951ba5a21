use super::{RunOutcome, RunnerPlugin, RunnerSession, RunnerStartArgs, Signal};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Cursor;
use std::path::PathBuf;
use tokio::io::AsyncRead;

/// Plays a captured renderer log back as if a renderer had written it.
pub struct ReplayRunnerPlugin {
    log_file: PathBuf,
    exit_code: i32,
}

impl ReplayRunnerPlugin {
    pub fn new(log_file: impl Into<PathBuf>, exit_code: i32) -> Self {
        Self {
            log_file: log_file.into(),
            exit_code,
        }
    }
}

#[async_trait]
impl RunnerPlugin for ReplayRunnerPlugin {
    fn name(&self) -> &str {
        "replay"
    }

    async fn start_session(&self, args: &RunnerStartArgs) -> Result<Box<dyn RunnerSession>> {
        let content = tokio::fs::read(&self.log_file)
            .await
            .with_context(|| format!("failed to read log {}", self.log_file.display()))?;
        tracing::info!(
            log = %self.log_file.display(),
            bytes = content.len(),
            would_run = %args.cmd,
            "replaying captured renderer output"
        );
        Ok(Box::new(ReplayRunnerSession {
            content: Some(content),
            exit_code: self.exit_code,
        }))
    }
}

struct ReplayRunnerSession {
    content: Option<Vec<u8>>,
    exit_code: i32,
}

#[async_trait]
impl RunnerSession for ReplayRunnerSession {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.content
            .take()
            .map(|c| Box::new(Cursor::new(c)) as Box<dyn AsyncRead + Unpin + Send>)
    }

    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        Some(Box::new(tokio::io::empty()))
    }

    async fn signal(&mut self, _signal: Signal) -> Result<()> {
        Ok(())
    }

    async fn wait(&mut self) -> Result<RunOutcome> {
        Ok(RunOutcome {
            exit_code: self.exit_code,
            duration_ms: Some(0),
        })
    }
}
