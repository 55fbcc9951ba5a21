use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default mayacmd data directory: ~/.mayacmd
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".mayacmd"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.mayacmd/config.toml (highest)
    let user_config = get_data_dir()?.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let cfg = if user_config.exists() {
        load_from_path(&user_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    Ok(apply_env_overrides(cfg))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    let mut cfg = toml::from_str::<AppConfig>(&s)?;
    if let Some(dir) = cfg.logging.directory.as_deref() {
        cfg.logging.directory = Some(shellexpand::tilde(dir).into_owned());
    }
    Ok(cfg)
}

fn apply_env_overrides(mut cfg: AppConfig) -> AppConfig {
    if let Ok(v) = std::env::var("MAYACMD_LOG_LEVEL") {
        if !v.trim().is_empty() {
            cfg.logging.level = v;
        }
    }
    if let Ok(v) = std::env::var("MAYACMD_SUPPRESS_WARNINGS") {
        cfg.plugin.suppress_warnings = parse_flag(&v);
    }
    if let Ok(v) = std::env::var("MAYACMD_EVENTS_OUT") {
        if !v.trim().is_empty() {
            cfg.events_out.enabled = true;
            cfg.events_out.path = v;
        }
    }
    cfg
}

fn parse_flag(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
