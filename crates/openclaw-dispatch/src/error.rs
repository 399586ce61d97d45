use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("agent spawn failed: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("agent {agent} timed out after {ms}ms")]
    Timeout { agent: String, ms: u64 },

    #[error("wait task for agent {agent} panicked")]
    WaitTaskFailed { agent: String },
}

pub type Result<T> = std::result::Result<T, DispatchError>;
