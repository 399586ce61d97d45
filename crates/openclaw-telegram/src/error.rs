use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("telegram API returned ok=false: {0}")]
    ApiError(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TelegramError>;
