//! Route configuration and setup.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Slack for multipart boundaries and part headers on top of the file
/// size ceiling.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let video_body_limit =
        DefaultBodyLimit::max(state.config.max_video_upload_bytes + MULTIPART_OVERHEAD_BYTES);
    let thumbnail_body_limit =
        DefaultBodyLimit::max(state.config.max_thumbnail_upload_bytes + MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route(
            "/api/videos",
            post(handlers::videos::create_video).get(handlers::videos::list_videos),
        )
        .route(
            "/api/videos/{video_id}",
            get(handlers::videos::get_video).delete(handlers::videos::delete_video),
        )
        .route(
            "/api/videos/{video_id}/video",
            put(handlers::video_upload::upload_video).layer(video_body_limit),
        )
        .route(
            "/api/videos/{video_id}/thumbnail",
            put(handlers::thumbnail_upload::upload_thumbnail).layer(thumbnail_body_limit),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
