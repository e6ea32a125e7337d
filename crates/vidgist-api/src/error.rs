//! Gateway error types.
//!
//! Every upstream failure is mapped to `{status, message}`: the upstream
//! HTTP status when present (500 otherwise) and the upstream message when
//! present (a route-specific fallback otherwise). Clients never see a stack
//! trace.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use vidgist_tl_client::TlError;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl GatewayError {
    /// Map an upstream client failure, falling back to the route's default
    /// message and 500 when the upstream provided nothing usable.
    pub fn upstream(err: TlError, fallback: &str) -> Self {
        warn!("Upstream request failed: {}", err);

        let status = err
            .status()
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = err
            .message()
            .map(String::from)
            .unwrap_or_else(|| fallback.to_string());

        Self::Upstream { status, message }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Upstream { status, .. } => *status,
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    status: u16,
    message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            status: status.as_u16(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_mapping_with_fallbacks() {
        let err = GatewayError::upstream(
            TlError::Upstream {
                status: 404,
                message: None,
            },
            "Error Getting a Video",
        );
        match err {
            GatewayError::Upstream { status, message } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "Error Getting a Video");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_upstream_message_wins_over_fallback() {
        let err = GatewayError::upstream(
            TlError::Upstream {
                status: 429,
                message: Some("Rate limit exceeded".into()),
            },
            "Error Getting Videos",
        );
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }
}
