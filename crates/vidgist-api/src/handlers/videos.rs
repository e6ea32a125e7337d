//! Video proxy handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListVideosQuery {
    pub page_limit: Option<u32>,
}

/// List videos in an index.
pub async fn list_videos(
    State(state): State<AppState>,
    Path(index_id): Path<String>,
    Query(query): Query<ListVideosQuery>,
) -> GatewayResult<Json<Value>> {
    let body = state
        .upstream
        .list_videos(&index_id, query.page_limit)
        .await
        .map_err(|e| GatewayError::upstream(e, "Error Getting Videos"))?;

    Ok(Json(body))
}

/// Fetch one video's metadata.
pub async fn get_video(
    State(state): State<AppState>,
    Path((index_id, video_id)): Path<(String, String)>,
) -> GatewayResult<Json<Value>> {
    let body = state
        .upstream
        .get_video(&index_id, &video_id)
        .await
        .map_err(|e| GatewayError::upstream(e, "Error Getting a Video"))?;

    Ok(Json(body))
}
