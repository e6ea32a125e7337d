//! Poller error types.

use thiserror::Error;

use vidgist_models::SelectionError;

pub type PollerResult<T> = Result<T, PollerError>;

#[derive(Debug, Error)]
pub enum PollerError {
    #[error("Gateway returned {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Invalid generation request: {0}")]
    Selection(#[from] SelectionError),
}
