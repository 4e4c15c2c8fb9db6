use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Link not found")]
    NotFound,
    #[error("Link expired at {0}")]
    Expired(DateTime<Utc>),
    #[error("No free code found after {0} attempts")]
    CodeSpaceExhausted(u32),
    #[error("Click recording failed: {0}")]
    RecordingFailure(String),
    #[error("Store operation '{0}' timed out")]
    Timeout(&'static str),
    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}
