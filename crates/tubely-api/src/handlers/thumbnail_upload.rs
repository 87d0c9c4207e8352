//! Thumbnail upload endpoint.
//!
//! Same shape as the video endpoint but without the remux/classify steps:
//! validate, read, store under a random `thumbnails/` key, persist the
//! public URL.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::handlers::{missing_field, multipart_read_error};
use crate::ingest::to_playable;
use crate::state::AppState;
use tubely_core::models::VideoResponse;
use tubely_core::validation::{
    thumbnail_extension, validate_content_type, THUMBNAIL_CONTENT_TYPES,
};
use tubely_core::AppError;
use tubely_storage::allocate_thumbnail_key;

/// `PUT /api/videos/{video_id}/thumbnail`
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    tracing::info!(video_id = %video_id, user_id = %user_id, "Uploading thumbnail");

    let video = state
        .videos
        .get(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;
    if video.user_id != user_id {
        return Err(AppError::Forbidden(
            "Only the video's owner may upload a thumbnail".to_string(),
        )
        .into());
    }

    // The matching field is consumed within the loop; the declared type
    // is checked before any of the body is read.
    let mut upload: Option<(String, &'static str, Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_read_error)? {
        if field.name() != Some("thumbnail") {
            continue;
        }
        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        validate_content_type(&media_type, THUMBNAIL_CONTENT_TYPES)?;
        let extension = thumbnail_extension(&media_type)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read thumbnail: {}", e)))?;
        upload = Some((media_type, extension, data));
        break;
    }
    let Some((media_type, extension, data)) = upload else {
        return Err(missing_field("thumbnail").into());
    };

    if data.len() > state.config.max_thumbnail_upload_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "Thumbnail exceeds {} bytes",
            state.config.max_thumbnail_upload_bytes
        ))
        .into());
    }

    let key = allocate_thumbnail_key(extension);
    state.storage.put(&key, data, &media_type).await?;
    let url = state.storage.public_url(&key);
    state.videos.update_thumbnail_url(video_id, &url).await?;

    let video = state
        .videos
        .get(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;
    Ok(Json(to_playable(video, state.storage.as_ref()).await?))
}
