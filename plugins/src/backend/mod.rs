pub mod maya;

pub use maya::{resolve_render_executable, version_keys};
