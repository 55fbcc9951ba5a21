use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub plugin: PluginConfig,

    #[serde(default)]
    pub control: ControlConfig,

    #[serde(default)]
    pub events_out: EventsOutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "mayacmd_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// Worker-level plugin configuration (the host's "config entries", as
/// opposed to the per-job plugin info).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Drop tolerated `Warning:` lines from the log when strict error
    /// checking is on.
    #[serde(default)]
    pub suppress_warnings: bool,

    /// Pass `-pythonver 2` to Maya 2022 on Windows and Linux.
    #[serde(default)]
    pub use_python2: bool,

    /// Workers that hold an interactive Maxwell license.
    #[serde(default)]
    pub maxwell_interactive_workers: Vec<String>,

    /// Candidate `Render` executables keyed by Maya version ("2023", "2016_5").
    #[serde(default)]
    pub executables: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    #[serde(default = "default_line_channel_capacity")]
    pub line_channel_capacity: usize,

    /// Bytes of stdout/stderr kept for the task report.
    #[serde(default = "default_capture_bytes")]
    pub capture_bytes: usize,

    /// Delay between a fatal line and killing the renderer.
    #[serde(default)]
    pub kill_grace_ms: u64,

    /// Run stderr lines through the output rules too. Maya prints its
    /// `// Error:` and `// Warning:` messages on stderr.
    #[serde(default = "default_dispatch_stderr")]
    pub dispatch_stderr: bool,
}

fn default_line_channel_capacity() -> usize {
    1024
}

fn default_capture_bytes() -> usize {
    65536
}

fn default_dispatch_stderr() -> bool {
    true
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            line_channel_capacity: default_line_channel_capacity(),
            capture_bytes: default_capture_bytes(),
            kill_grace_ms: 0,
            dispatch_stderr: default_dispatch_stderr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsOutConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_events_path")]
    pub path: String,
    #[serde(default = "default_events_capacity")]
    pub channel_capacity: usize,
    #[serde(default = "default_drop_when_full")]
    pub drop_when_full: bool,
}

fn default_events_path() -> String {
    "./mayacmd.events.jsonl".to_string()
}

fn default_events_capacity() -> usize {
    2048
}

fn default_drop_when_full() -> bool {
    true
}

impl Default for EventsOutConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_events_path(),
            channel_capacity: default_events_capacity(),
            drop_when_full: default_drop_when_full(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert!(cfg.logging.enabled);
        assert!(!cfg.plugin.suppress_warnings);
        assert_eq!(cfg.control.line_channel_capacity, 1024);
        assert!(cfg.control.dispatch_stderr);
        assert!(!cfg.events_out.enabled);
    }

    #[test]
    fn parses_plugin_section() {
        let cfg: AppConfig = toml::from_str(
            r#"
[plugin]
suppress_warnings = true
maxwell_interactive_workers = ["render-07"]

[plugin.executables]
"2023" = ["/usr/autodesk/maya2023/bin/Render"]
"#,
        )
        .unwrap();
        assert!(cfg.plugin.suppress_warnings);
        assert_eq!(cfg.plugin.maxwell_interactive_workers, vec!["render-07"]);
        assert_eq!(
            cfg.plugin.executables["2023"],
            vec!["/usr/autodesk/maya2023/bin/Render".to_string()]
        );
    }
}
