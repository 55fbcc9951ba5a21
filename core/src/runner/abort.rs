use std::time::Duration;

use super::traits::RunnerSession;
use super::types::Signal;

/// Stop the renderer after a fatal line. Remaining output is discarded by
/// the caller.
pub async fn abort_sequence(session: &mut Box<dyn RunnerSession>, kill_grace_ms: u64, reason: &str) {
    tracing::warn!(error.kind = "render.abort", reason = %first_line(reason), "killing renderer");
    if kill_grace_ms > 0 {
        tokio::time::sleep(Duration::from_millis(kill_grace_ms)).await;
    }
    if let Err(e) = session.signal(Signal::Kill).await {
        tracing::warn!(error = %e, "failed to kill renderer");
    }
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or(s)
}
