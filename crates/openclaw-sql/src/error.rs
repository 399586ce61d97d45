use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlError {
    #[error("failed to spawn psql: {0}")]
    Spawn(std::io::Error),

    #[error("psql timed out after {ms}ms")]
    Timeout { ms: u64 },

    #[error("psql wait task panicked")]
    WaitTaskFailed,
}

pub type Result<T> = std::result::Result<T, SqlError>;
