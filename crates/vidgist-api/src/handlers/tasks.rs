//! Indexing task handlers: multipart upload and status checks.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde_json::Value;
use tracing::info;

use vidgist_tl_client::UploadFile;

use crate::error::{GatewayError, GatewayResult};
use crate::state::AppState;

/// Multipart field carrying the video file.
const VIDEO_FILE_FIELD: &str = "video_file";

/// Submit a video for indexing.
///
/// The browser sends a multipart form with a `video_file` part plus
/// arbitrary extra fields. Non-file fields are forwarded verbatim; the file
/// keeps its original filename and declared content type.
pub async fn index_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> GatewayResult<Json<Value>> {
    let mut fields: Vec<(String, String)> = Vec::new();
    let mut file: Option<UploadFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::bad_request(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == VIDEO_FILE_FIELD {
            let filename = field.file_name().unwrap_or("video").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| GatewayError::bad_request(format!("Failed to read file: {e}")))?;
            file = Some(UploadFile::new(filename, content_type, bytes.to_vec()));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| GatewayError::bad_request(format!("Failed to read field: {e}")))?;
            fields.push((name, value));
        }
    }

    let file = file
        .ok_or_else(|| GatewayError::bad_request(format!("Missing {VIDEO_FILE_FIELD} field")))?;

    info!(filename = %file.filename, size = file.bytes.len(), "Forwarding video upload");

    let body = state
        .upstream
        .create_task(fields, file)
        .await
        .map_err(|e| GatewayError::upstream(e, "Error indexing a Video"))?;

    if let Some(task_id) = body.get("_id").and_then(Value::as_str) {
        info!(task_id = %task_id, "Indexing task created");
    }

    Ok(Json(body))
}

/// Fetch the current status of an indexing task, verbatim.
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> GatewayResult<Json<Value>> {
    let body = state
        .upstream
        .get_task(&task_id)
        .await
        .map_err(|e| GatewayError::upstream(e, "Error getting a task"))?;

    Ok(Json(body))
}
