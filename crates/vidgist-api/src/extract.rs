//! Request extractors.

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;

use crate::error::GatewayError;

/// JSON body extractor that reports failures in the gateway's
/// `{status, message}` shape instead of axum's plain-text rejection.
pub struct GatewayJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for GatewayJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| GatewayError::bad_request(rejection.body_text()))?;

        Ok(Self(value))
    }
}
