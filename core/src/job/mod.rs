mod plugin_info;
mod settings;
mod task;
mod version;

pub use plugin_info::PluginInfo;
pub use settings::{default_for, normalize_path, JobSettings, DEFAULTS};
pub use task::{FrameRange, TaskContext};
pub use version::MayaVersion;
