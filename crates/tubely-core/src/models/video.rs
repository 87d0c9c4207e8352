//! Video record model and the stored playback reference format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

/// A video metadata record.
///
/// `video_url` holds the durable playback reference in the stored
/// `"<bucket>,<key>"` form (see [`PlaybackRef`]), never a signed URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a draft video record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideoParams {
    pub title: String,
    pub description: String,
}

/// API response shape for a video.
///
/// Identical to [`Video`] except that `video_url`, when present, has been
/// translated to a time-limited signed URL. The stored record is never
/// mutated by that translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Video> for VideoResponse {
    fn from(v: Video) -> Self {
        VideoResponse {
            id: v.id,
            user_id: v.user_id,
            title: v.title,
            description: v.description,
            video_url: v.video_url,
            thumbnail_url: v.thumbnail_url,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

/// The durable playback reference: an object-store bucket and key.
///
/// Stored as the ASCII string `"<bucket>,<key>"`. The format predates this
/// implementation and must be preserved exactly for backward read
/// compatibility; this type is the only place that encodes or decodes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRef {
    pub bucket: String,
    pub key: String,
}

impl PlaybackRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        PlaybackRef {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl Display for PlaybackRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{},{}", self.bucket, self.key)
    }
}

impl FromStr for PlaybackRef {
    type Err = AppError;

    /// Decompose a stored reference into exactly two non-empty tokens.
    ///
    /// Zero commas, more than one comma, or an empty token all fail the
    /// read: a half-translated reference must never leak to a caller.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let bucket = parts.next().unwrap_or_default();
        let key = parts.next().unwrap_or_default();

        if parts.next().is_some() {
            return Err(AppError::MalformedPlaybackRef(format!(
                "expected '<bucket>,<key>', got {} comma-separated tokens",
                s.split(',').count()
            )));
        }
        if bucket.is_empty() || key.is_empty() {
            return Err(AppError::MalformedPlaybackRef(
                "expected '<bucket>,<key>' with non-empty tokens".to_string(),
            ));
        }

        Ok(PlaybackRef::new(bucket, key))
    }
}

impl Video {
    /// Parse the stored playback reference, if any.
    ///
    /// An absent or empty reference means the video has not been uploaded
    /// yet; a present but malformed reference is an error.
    pub fn playback_ref(&self) -> Result<Option<PlaybackRef>, AppError> {
        match self.video_url.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}
