use std::sync::Arc;

use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::RunnerError;
use crate::util::RingBytes;

/// Longest line handed to the dispatcher; longer runs are cut.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

#[derive(Debug)]
pub struct LineTap {
    pub line: String,
    pub stream: LineStream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStream {
    Stdout,
    Stderr,
}

impl LineStream {
    pub fn label(self) -> &'static str {
        match self {
            LineStream::Stdout => "stdout",
            LineStream::Stderr => "stderr",
        }
    }
}

pub fn pump_stdout<R>(
    rd: R,
    ring: Arc<RingBytes>,
    line_tx: mpsc::Sender<LineTap>,
) -> JoinHandle<Result<u64, RunnerError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    pump(rd, ring, line_tx, LineStream::Stdout)
}

pub fn pump_stderr<R>(
    rd: R,
    ring: Arc<RingBytes>,
    line_tx: mpsc::Sender<LineTap>,
) -> JoinHandle<Result<u64, RunnerError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    pump(rd, ring, line_tx, LineStream::Stderr)
}

fn pump<R>(
    mut rd: R,
    ring: Arc<RingBytes>,
    line_tx: mpsc::Sender<LineTap>,
    stream: LineStream,
) -> JoinHandle<Result<u64, RunnerError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; 16 * 1024];
        let mut total = 0u64;
        let mut splitter = LineSplitter::default();

        loop {
            let n = rd.read(&mut buf).await.map_err(|e| RunnerError::StreamIo {
                stream: stream.label(),
                source: e,
            })?;
            if n == 0 {
                break;
            }

            ring.push(&buf[..n]);
            total += n as u64;

            for one in splitter.push(&buf[..n]) {
                let line = String::from_utf8_lossy(&one).into_owned();
                if line_tx.send(LineTap { line, stream }).await.is_err() {
                    // Receiver gone: the task loop stopped listening.
                    return Ok(total);
                }
            }
        }

        if let Some(rest) = splitter.finish() {
            let line = String::from_utf8_lossy(&rest).into_owned();
            let _ = line_tx.send(LineTap { line, stream }).await;
        }

        Ok(total)
    })
}

/// Splits a byte stream into lines. `\n`, `\r\n` and a lone `\r` (progress
/// redraws) each end a line, and a line is cut at [`MAX_LINE_BYTES`].
#[derive(Debug, Default)]
struct LineSplitter {
    buf: Vec<u8>,
    after_cr: bool,
}

impl LineSplitter {
    fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        for &b in chunk {
            if std::mem::take(&mut self.after_cr) && b == b'\n' {
                continue;
            }
            match b {
                b'\n' => out.push(std::mem::take(&mut self.buf)),
                b'\r' => {
                    out.push(std::mem::take(&mut self.buf));
                    self.after_cr = true;
                }
                _ => {
                    self.buf.push(b);
                    if self.buf.len() >= MAX_LINE_BYTES {
                        out.push(std::mem::take(&mut self.buf));
                    }
                }
            }
        }
        out
    }

    fn finish(&mut self) -> Option<Vec<u8>> {
        self.after_cr = false;
        (!self.buf.is_empty()).then(|| std::mem::take(&mut self.buf))
    }
}
