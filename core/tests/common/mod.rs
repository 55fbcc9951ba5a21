#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;

use async_trait::async_trait;
use mayacmd_core::api::{
    Effects, JobSettings, LineDispatcher, PluginInfo, ReportEvent, ReportSink, RunOutcome,
    RunnerSession, Signal,
};
use tokio::io::AsyncRead;

/// Route runtime logs to the test harness; repeated calls are harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("mayacmd_core=debug"))
        .with_test_writer()
        .try_init();
}

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

pub fn settings(pairs: &[(&str, &str)]) -> JobSettings {
    let mut info = PluginInfo::from_pairs([("Version", "2023"), ("SceneFile", "/jobs/shot.mb")]);
    for (k, v) in pairs {
        info.insert(k, v);
    }
    JobSettings::from_plugin_info(info).expect("valid job settings")
}

/// Feed every line of `log` through the dispatcher.
pub fn replay(dispatcher: &mut LineDispatcher, log: &str) -> Vec<Effects> {
    log.lines().map(|line| dispatcher.dispatch(line)).collect()
}

pub fn progress_values(effects: &[Effects]) -> Vec<f64> {
    effects.iter().filter_map(Effects::progress).collect()
}

/// Session whose stdout is a captured log and whose exit code is fixed.
pub struct ScriptedSession {
    stdout: Option<String>,
    stderr: Option<String>,
    exit_code: i32,
}

impl ScriptedSession {
    pub fn boxed(stdout: &str, exit_code: i32) -> Box<dyn RunnerSession> {
        Box::new(Self {
            stdout: Some(stdout.to_string()),
            stderr: Some(String::new()),
            exit_code,
        })
    }
}

fn reader(text: String) -> Box<dyn AsyncRead + Unpin + Send> {
    Box::new(Cursor::new(text.into_bytes()))
}

#[async_trait]
impl RunnerSession for ScriptedSession {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.stdout.take().map(reader)
    }

    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.stderr.take().map(reader)
    }

    async fn signal(&mut self, _signal: Signal) -> anyhow::Result<()> {
        Ok(())
    }

    async fn wait(&mut self) -> anyhow::Result<RunOutcome> {
        Ok(RunOutcome {
            exit_code: self.exit_code,
            duration_ms: Some(0),
        })
    }
}

#[derive(Default)]
pub struct CollectSink {
    pub events: Vec<ReportEvent>,
}

#[async_trait]
impl ReportSink for CollectSink {
    async fn emit(&mut self, ev: ReportEvent) {
        self.events.push(ev);
    }
}

impl CollectSink {
    pub fn progress(&self) -> Vec<f64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Progress { percent } => Some(*percent),
                _ => None,
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Line { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}
