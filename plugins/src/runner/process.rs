use super::{RunOutcome, RunnerPlugin, RunnerSession, RunnerStartArgs, Signal};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};

/// Launches the `Render` executable as a child process.
#[derive(Debug, Default)]
pub struct ProcessRunnerPlugin;

impl ProcessRunnerPlugin {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RunnerPlugin for ProcessRunnerPlugin {
    fn name(&self) -> &str {
        "process"
    }

    async fn start_session(&self, args: &RunnerStartArgs) -> Result<Box<dyn RunnerSession>> {
        let mut cmd = Command::new(&args.cmd);
        cmd.args(&args.args)
            .envs(args.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &args.cwd {
            cmd.current_dir(cwd);
        }

        tracing::info!(cmd = %args.cmd, args = args.args.len(), "starting renderer");
        let child = cmd
            .spawn()
            .with_context(|| format!("failed to start {}", args.cmd))?;

        Ok(Box::new(ProcessRunnerSession {
            child,
            started_at: Instant::now(),
        }))
    }
}

struct ProcessRunnerSession {
    child: Child,
    started_at: Instant,
}

#[async_trait]
impl RunnerSession for ProcessRunnerSession {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.child
            .stdout
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.child
            .stderr
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    async fn signal(&mut self, signal: Signal) -> Result<()> {
        // Term has no portable equivalent on the child handle; both kill.
        tracing::debug!(?signal, pid = ?self.child.id(), "signalling renderer");
        self.child.kill().await.context("failed to kill renderer")
    }

    async fn wait(&mut self) -> Result<RunOutcome> {
        let status = self.child.wait().await?;
        Ok(RunOutcome {
            exit_code: status.code().unwrap_or(-1),
            duration_ms: Some(self.started_at.elapsed().as_millis() as u64),
        })
    }
}
