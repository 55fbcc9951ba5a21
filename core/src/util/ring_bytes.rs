use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Fixed-capacity byte buffer keeping the most recent output of a stream.
pub struct RingBytes {
    inner: Mutex<VecDeque<u8>>,
    cap: usize,
}

impl RingBytes {
    pub fn new(cap: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(VecDeque::with_capacity(cap)),
            cap,
        })
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<u8>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, data: &[u8]) {
        let mut g = self.lock();
        let data = if data.len() > self.cap {
            &data[data.len() - self.cap..]
        } else {
            data
        };
        let overflow = g.len().saturating_add(data.len()).saturating_sub(self.cap);
        if overflow > 0 {
            g.drain(..overflow);
        }
        g.extend(data);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let g = self.lock();
        g.iter().copied().collect()
    }
}
