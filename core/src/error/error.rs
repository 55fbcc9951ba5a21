use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("runner failed: {0}")]
    Runner(#[from] RunnerError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("command failed: {0}")]
    Command(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("config error: {0}")]
    Config(String),
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("stream io error: {stream} {source}")]
    StreamIo {
        stream: &'static str,
        source: std::io::Error,
    },
    #[error("plugin error: {0}")]
    Plugin(#[from] anyhow::Error),
}

/// Problems with the job description or worker configuration, detected
/// before the renderer is launched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("plugin info entry '{key}' is required")]
    MissingEntry { key: String },

    #[error("plugin info entry '{key}' has an invalid {expected} value: {value}")]
    InvalidEntry {
        key: String,
        expected: &'static str,
        value: String,
    },

    #[error("Rendering Half Frames is not supported by this renderer.")]
    HalfFramesUnsupported,

    #[error("The Worker does not have affinity for any of the GPUs specified in the job.")]
    NoGpuAffinity,

    #[error("no render executable configured for Maya {0}")]
    ExecutableNotFound(String),

    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
}

impl ConfigError {
    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingEntry { key: key.into() }
    }

    pub fn invalid(key: impl Into<String>, expected: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidEntry {
            key: key.into(),
            expected,
            value: value.into(),
        }
    }
}
