//! Gateway routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::generate::{generate_text, gist_video, summarize_video};
use crate::handlers::health::health;
use crate::handlers::tasks::{get_task, index_video};
use crate::handlers::videos::{get_video, list_videos};
use crate::middleware::{cors_layer, handle_panic, request_id, request_logging};
use crate::state::AppState;

/// Create the gateway router.
pub fn create_router(state: AppState) -> Router {
    let proxy_routes = Router::new()
        // Videos
        .route("/indexes/:index_id/videos", get(list_videos))
        .route("/indexes/:index_id/videos/:video_id", get(get_video))
        // Generation
        .route("/videos/:video_id/generate", post(generate_text))
        .route("/videos/:video_id/summarize", post(summarize_video))
        .route("/videos/:video_id/gist", post(gist_video))
        // Indexing tasks
        .route("/index", post(index_video))
        .route("/tasks/:task_id", get(get_task));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health));

    Router::new()
        .merge(proxy_routes)
        .merge(health_routes)
        // Body limits sized for video uploads
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origin))
        .with_state(state)
}
