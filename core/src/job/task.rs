use serde::{Deserialize, Serialize};

/// Frames assigned to one task. Fixed for the task's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: i64,
    pub end: i64,
}

impl FrameRange {
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub const fn single(frame: i64) -> Self {
        Self::new(frame, frame)
    }

    /// `end - start + 1`; zero or negative for a degenerate range.
    pub const fn span(&self) -> i64 {
        self.end.saturating_sub(self.start).saturating_add(1)
    }

    /// Positive frame count, or `None` when progress can't be computed.
    pub fn frame_count(&self) -> Option<i64> {
        let span = self.span();
        (span > 0).then_some(span)
    }
}

/// Host metadata for the task being executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContext {
    pub frames: FrameRange,
    /// Host task id; tile jobs use it to select their region entries.
    pub task_id: String,
    /// Render thread index on this worker, used for GPU-per-task offsets.
    pub thread_number: u32,
    pub worker_name: String,
    /// Each task of the job renders one region of a single frame.
    pub tile_job: bool,
    /// GPUs this worker is restricted to, when the worker overrides affinity.
    pub gpu_affinity: Option<Vec<u32>>,
}

impl TaskContext {
    pub fn new(frames: FrameRange) -> Self {
        Self {
            frames,
            task_id: "0".to_string(),
            thread_number: 0,
            worker_name: String::new(),
            tile_job: false,
            gpu_affinity: None,
        }
    }
}
