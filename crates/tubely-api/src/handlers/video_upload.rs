//! Video upload endpoint.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::handlers::{field_stream, missing_field, multipart_read_error};
use crate::ingest::IngestPipeline;
use crate::state::AppState;
use tubely_core::models::VideoResponse;

/// `PUT /api/videos/{video_id}/video`
///
/// Accepts a multipart body with a single `"video"` file field and runs
/// the full ingest pipeline. The response carries a short-lived signed
/// playback URL; the stored record keeps the durable `bucket,key` form.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    tracing::info!(video_id = %video_id, user_id = %user_id, "Uploading video");

    // Fields must be consumed within the loop body: each `next_field`
    // call re-borrows the multipart body. Non-matching fields are
    // skipped without reading their contents.
    while let Some(field) = multipart.next_field().await.map_err(multipart_read_error)? {
        if field.name() != Some("video") {
            continue;
        }
        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let pipeline = IngestPipeline::new(
            state.videos.clone(),
            state.storage.clone(),
            state.media_tool.clone(),
            state.config.max_video_upload_bytes,
        );
        let response = pipeline
            .run(video_id, user_id, &media_type, field_stream(field))
            .await?;
        return Ok(Json(response));
    }

    Err(missing_field("video").into())
}
