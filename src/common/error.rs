use axum::http::StatusCode;
use thiserror::Error;

/// Terminal failures of a normalization job. None of them are retried.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    SourceFetch(String),

    /// Carries the encoder's own diagnostic text.
    #[error("{0}")]
    Transcode(String),

    #[error("{0}")]
    Upload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NormalizeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            NormalizeError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
