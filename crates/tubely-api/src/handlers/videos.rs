//! Video record CRUD endpoints.
//!
//! Reads translate the stored playback reference to a signed URL via
//! `to_playable`; the durable record is never mutated on the read path.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::ingest::to_playable;
use crate::state::AppState;
use tubely_core::models::{CreateVideoParams, VideoResponse};
use tubely_core::AppError;

/// `POST /api/videos`: create a draft record for the caller.
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(params): Json<CreateVideoParams>,
) -> Result<(StatusCode, Json<VideoResponse>), HttpAppError> {
    if params.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title must not be empty".to_string()).into());
    }

    let video = state.videos.create(user_id, params).await?;
    tracing::info!(video_id = %video.id, user_id = %user_id, "Video record created");
    Ok((StatusCode::CREATED, Json(VideoResponse::from(video))))
}

/// `GET /api/videos`: list the caller's videos.
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let videos = state.videos.list_for_user(user_id).await?;

    let mut responses = Vec::with_capacity(videos.len());
    for video in videos {
        responses.push(to_playable(video, state.storage.as_ref()).await?);
    }
    Ok(Json(responses))
}

/// `GET /api/videos/{video_id}`
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = state
        .videos
        .get(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    Ok(Json(to_playable(video, state.storage.as_ref()).await?))
}

/// `DELETE /api/videos/{video_id}`: owner only.
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
    AuthUser(user_id): AuthUser,
) -> Result<StatusCode, HttpAppError> {
    let video = state
        .videos
        .get(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;
    if video.user_id != user_id {
        return Err(
            AppError::Forbidden("Only the video's owner may delete it".to_string()).into(),
        );
    }

    state.videos.delete(video_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
