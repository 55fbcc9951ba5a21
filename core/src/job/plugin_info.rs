use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;

/// Key/value job description supplied by the host.
///
/// Keys are matched case-insensitively; the original spelling is kept for
/// error messages.
#[derive(Debug, Clone, Default)]
pub struct PluginInfo {
    entries: BTreeMap<String, (String, String)>,
}

impl PluginInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the host's `Key=Value` format. Blank lines and lines starting
    /// with `#` or `;` are ignored, as are lines without `=`.
    pub fn parse(text: &str) -> Self {
        let mut info = Self::new();
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::debug!(line = %line, "skipping plugin info line without '='");
                continue;
            };
            info.insert(key.trim(), value.trim());
        }
        info
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::parse(&text))
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut info = Self::new();
        for (k, v) in pairs {
            info.insert(k, v);
        }
        info
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries
            .insert(key.to_ascii_lowercase(), (key.to_string(), value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_ascii_lowercase())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::missing(key))
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(default),
            Some(v) => parse_bool(v).ok_or_else(|| ConfigError::invalid(key, "boolean", v)),
        }
    }

    pub fn get_int_or(&self, key: &str, default: i64) -> Result<i64, ConfigError> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(default),
            Some(v) => v
                .parse::<i64>()
                .map_err(|_| ConfigError::invalid(key, "integer", v)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
