//! Generation proxy handlers.
//!
//! All three routes accept `{"data": {...}}` from the browser and merge the
//! `data` object with the target video id before forwarding.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{GatewayError, GatewayResult};
use crate::extract::GatewayJson;
use crate::state::AppState;

/// Browser request envelope.
#[derive(Deserialize)]
pub struct DataEnvelope {
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// Open-ended text generation for a video.
pub async fn generate_text(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    GatewayJson(envelope): GatewayJson<DataEnvelope>,
) -> GatewayResult<Json<Value>> {
    let body = state
        .upstream
        .generate(&video_id, envelope.data)
        .await
        .map_err(|e| GatewayError::upstream(e, "Error Generating Text"))?;

    Ok(Json(body))
}

/// Summary/chapter/highlight generation for a video.
pub async fn summarize_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    GatewayJson(envelope): GatewayJson<DataEnvelope>,
) -> GatewayResult<Json<Value>> {
    let body = state
        .upstream
        .summarize(&video_id, envelope.data)
        .await
        .map_err(|e| GatewayError::upstream(e, "Error Summarizing a Video"))?;

    Ok(Json(body))
}

/// Title/topic/hashtag generation for a video.
pub async fn gist_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    GatewayJson(envelope): GatewayJson<DataEnvelope>,
) -> GatewayResult<Json<Value>> {
    let body = state
        .upstream
        .gist(&video_id, envelope.data)
        .await
        .map_err(|e| GatewayError::upstream(e, "Error Generating Gist of a Video"))?;

    Ok(Json(body))
}
