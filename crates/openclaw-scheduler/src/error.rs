use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid cron expression")]
    InvalidCron,

    #[error("filesystem error writing job files: {0}")]
    Io(#[from] std::io::Error),

    #[error("supervisor command failed: {0}")]
    SupervisorFailed(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
