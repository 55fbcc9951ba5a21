use std::path::{Path, PathBuf};

use mayacmd_core::api::{ConfigError, MayaVersion, PluginConfig};

/// Keys tried in `plugin.executables`, most specific first.
pub fn version_keys(version: &MayaVersion) -> Vec<String> {
    let mut keys = vec![version.executable_key(), version.to_string()];
    keys.dedup();
    keys
}

/// Pick the `Render` executable for `version`. An explicit override wins;
/// otherwise the first configured candidate that exists is used. Bare
/// command names are looked up on PATH.
pub fn resolve_render_executable(
    version: &MayaVersion,
    plugin: &PluginConfig,
    explicit: Option<&str>,
) -> Result<PathBuf, ConfigError> {
    tracing::info!("Rendering with Maya version {version}");

    if let Some(exe) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return locate(exe).ok_or_else(|| ConfigError::ExecutableNotFound(exe.to_string()));
    }

    let candidates = version_keys(version)
        .into_iter()
        .find_map(|key| plugin.executables.get(&key))
        .ok_or_else(|| ConfigError::ExecutableNotFound(version.to_string()))?;

    for candidate in candidates {
        if let Some(path) = locate(candidate.trim()) {
            tracing::debug!(path = %path.display(), "render executable resolved");
            return Ok(path);
        }
        tracing::debug!(candidate = %candidate, "render executable candidate not found");
    }
    Err(ConfigError::ExecutableNotFound(version.to_string()))
}

fn locate(candidate: &str) -> Option<PathBuf> {
    if candidate.is_empty() {
        return None;
    }
    let path = Path::new(candidate);
    if path.components().count() > 1 || path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }
    which::which(candidate).ok()
}
