use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::config::EventsOutConfig;

/// Handle to the background JSONL writer.
#[derive(Clone)]
pub struct EventsOutTx {
    tx: mpsc::Sender<String>,
    dropped: Arc<AtomicU64>,
    drop_when_full: bool,
}

impl EventsOutTx {
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub async fn send_line(&self, line: String) {
        if self.drop_when_full {
            if self.tx.try_send(line).is_err() {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        } else if self.tx.send(line).await.is_err() {
            // writer closed
        }
    }
}

/// Start the writer task. `path = "stdout:"` writes to standard output;
/// anything else is opened in append mode.
pub async fn start_events_out(cfg: &EventsOutConfig) -> Result<Option<EventsOutTx>, String> {
    if !cfg.enabled || cfg.path.trim().is_empty() {
        return Ok(None);
    }

    let path = cfg.path.clone();
    let mut writer: Box<dyn tokio::io::AsyncWrite + Unpin + Send> = if path == "stdout:" {
        Box::new(tokio::io::stdout())
    } else {
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| format!("failed to open events file {path}: {e}"))?;
        Box::new(file)
    };

    let (tx, mut rx) = mpsc::channel::<String>(cfg.channel_capacity.max(1));
    let dropped = Arc::new(AtomicU64::new(0));

    tokio::spawn(async move {
        while let Some(mut line) = rx.recv().await {
            if !line.ends_with('\n') {
                line.push('\n');
            }
            if let Err(e) = writer.write_all(line.as_bytes()).await {
                tracing::warn!(error = %e, path = %path, "events writer stopped");
                return;
            }
        }
        let _ = writer.flush().await;
    });

    Ok(Some(EventsOutTx {
        tx,
        dropped,
        drop_when_full: cfg.drop_when_full,
    }))
}
