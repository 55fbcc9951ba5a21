use serde::Serialize;

use crate::events_out::EventsOutTx;

pub async fn write_event<T: Serialize + ?Sized>(out: Option<&EventsOutTx>, ev: &T) {
    let Some(out) = out else {
        return;
    };
    match serde_json::to_string(ev) {
        Ok(line) => out.send_line(line).await,
        Err(e) => tracing::warn!(error = %e, "failed to serialize event"),
    }
}
