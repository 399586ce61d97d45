use thiserror::Error;

/// Errors shared by every `openclaw-*` crate that does not need a more
/// specific taxonomy of its own.
#[derive(Debug, Error)]
pub enum OpenclawError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] figment::Error),

    #[error("subprocess '{command}' timed out after {ms}ms")]
    Timeout { command: String, ms: u64 },

    #[error("subprocess '{command}' exited with code {code}: {stderr}")]
    SubprocessFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("unconfigured: {0}")]
    Unconfigured(String),
}

impl OpenclawError {
    /// A stable SCREAMING_SNAKE code for logging / HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::SubprocessFailed { .. } => "SUBPROCESS_FAILED",
            Self::Unconfigured(_) => "UNCONFIGURED",
        }
    }
}

pub type Result<T> = std::result::Result<T, OpenclawError>;
