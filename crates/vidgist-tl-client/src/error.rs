//! Upstream client error types.

use thiserror::Error;

pub type TlResult<T> = Result<T, TlError>;

#[derive(Debug, Error)]
pub enum TlError {
    #[error("Upstream returned {status}: {}", message.as_deref().unwrap_or("<no message>"))]
    Upstream {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl TlError {
    /// HTTP status of the failure, when the upstream produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TlError::Upstream { status, .. } => Some(*status),
            TlError::Network(e) => e.status().map(|s| s.as_u16()),
            TlError::InvalidResponse(_) => None,
        }
    }

    /// Upstream error message, when one was present in the response body.
    pub fn message(&self) -> Option<&str> {
        match self {
            TlError::Upstream { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
