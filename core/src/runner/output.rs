use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::events_out::{write_event, EventsOutTx};

use super::io_pump::LineStream;
use super::types::TaskVerdict;

/// What the task loop reports to the host while a render runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportEvent {
    Line { stream: LineStream, text: String },
    Progress { percent: f64 },
    Status { message: String },
    Info { message: String },
    Warning { message: String },
    Failed { reason: String },
    Completed { verdict: TaskVerdict },
}

#[async_trait]
pub trait ReportSink: Send {
    async fn emit(&mut self, ev: ReportEvent);
}

/// Echoes renderer output to the parent's stdout/stderr and routes
/// everything else through `tracing`.
pub struct LogSink {
    echo: bool,
    stdout: tokio::io::Stdout,
    stderr: tokio::io::Stderr,
}

impl LogSink {
    pub fn new(echo: bool) -> Self {
        Self {
            echo,
            stdout: tokio::io::stdout(),
            stderr: tokio::io::stderr(),
        }
    }

    async fn write_line(writer: &mut (dyn tokio::io::AsyncWrite + Unpin + Send), s: &str) {
        let _ = writer.write_all(s.as_bytes()).await;
        let _ = writer.write_all(b"\n").await;
        let _ = writer.flush().await;
    }
}

#[async_trait]
impl ReportSink for LogSink {
    async fn emit(&mut self, ev: ReportEvent) {
        match ev {
            ReportEvent::Line { stream, text } => {
                if !self.echo {
                    return;
                }
                match stream {
                    LineStream::Stdout => Self::write_line(&mut self.stdout, &text).await,
                    LineStream::Stderr => Self::write_line(&mut self.stderr, &text).await,
                }
            }
            ReportEvent::Progress { percent } => tracing::debug!(percent, "progress"),
            ReportEvent::Status { message } => tracing::debug!(status = %message, "status"),
            ReportEvent::Info { message } => tracing::info!("{message}"),
            ReportEvent::Warning { message } => tracing::warn!("{message}"),
            ReportEvent::Failed { reason } => tracing::error!(error.kind = "render.fatal", "{reason}"),
            ReportEvent::Completed { verdict } => match verdict {
                TaskVerdict::Succeeded { .. } => tracing::info!("render task succeeded"),
                TaskVerdict::Failed { reason, kind } => {
                    tracing::error!(kind = ?kind, reason = %reason, "render task failed")
                }
            },
        }
    }
}

/// JSONL record written by [`EventsSink`].
#[derive(Debug, Serialize)]
struct EventRecord<'a> {
    ts: String,
    task_id: &'a str,
    #[serde(flatten)]
    event: &'a ReportEvent,
}

pub struct EventsSink {
    out: EventsOutTx,
    task_id: String,
}

impl EventsSink {
    pub fn new(out: EventsOutTx, task_id: impl Into<String>) -> Self {
        Self {
            out,
            task_id: task_id.into(),
        }
    }

    pub fn dropped_count(&self) -> u64 {
        self.out.dropped_count()
    }
}

#[async_trait]
impl ReportSink for EventsSink {
    async fn emit(&mut self, ev: ReportEvent) {
        let record = EventRecord {
            ts: chrono::Utc::now().to_rfc3339(),
            task_id: &self.task_id,
            event: &ev,
        };
        write_event(Some(&self.out), &record).await;
    }
}

/// Forwards events to a channel; the receiver drives progress display.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ReportEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<ReportEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl ReportSink for ChannelSink {
    async fn emit(&mut self, ev: ReportEvent) {
        let _ = self.tx.send(ev);
    }
}

#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl ReportSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn push(&mut self, sink: Box<dyn ReportSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl ReportSink for FanoutSink {
    async fn emit(&mut self, ev: ReportEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            sink.emit(ev.clone()).await;
        }
        last.emit(ev).await;
    }
}
