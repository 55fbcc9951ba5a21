use serde::Serialize;

/// Mutable per-task counters. Created fresh for every task and owned by the
/// dispatcher; nothing here outlives the task.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressState {
    /// Only ever increases within a task.
    pub finished_frame_count: u32,
    pub progress_percent: f64,
    pub status_message: String,
    pub vray: VrayState,
    pub mental_ray: MentalRayState,
    pub fumefx: FumeFxState,
    pub caustic: CausticState,
    pub renderman: RendermanState,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn complete_frame(&mut self) -> u32 {
        self.finished_frame_count += 1;
        self.finished_frame_count
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VrayState {
    /// Set by `V-Ray: Rendering image`, cleared by `Total frame time`.
    pub rendering_image: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MentalRayState {
    pub previous_written_frame: Option<String>,
    pub skip_next_completion: bool,
    /// The last written frame has already been counted.
    pub counted_since_write: bool,
    /// A repeated write arrived before the frame's first completion.
    pub skip_after_count: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FumeFxState {
    pub start_frame: i64,
    pub end_frame: i64,
    pub current_frame: i64,
    pub memory_used: String,
    pub frame_time: String,
    pub estimated_time: String,
}

impl Default for FumeFxState {
    fn default() -> Self {
        Self {
            start_frame: 0,
            end_frame: 0,
            current_frame: 0,
            memory_used: "0Mb".to_string(),
            frame_time: "00:00.00".to_string(),
            estimated_time: "00:00:00".to_string(),
        }
    }
}

impl FumeFxState {
    pub fn status_message(&self) -> String {
        format!(
            "FumeFX: ({} to {}) - Mem: {} - LastTime: {} - ETA: {}",
            self.current_frame,
            self.end_frame,
            self.memory_used,
            self.frame_time,
            self.estimated_time
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CausticState {
    pub current_frame: i64,
    pub total_passes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RendermanState {
    /// First frame number reported in this task.
    pub initial_frame: Option<f64>,
}
