//! Video ingestion pipeline.
//!
//! The upload path is an explicit state machine:
//!
//! `Received → Validated → Staged → Remuxed → Classified → Keyed → Stored
//! → Persisted → Responded`
//!
//! Each transition is a method on [`IngestPipeline`]; any `Err` is the
//! absorbing abort state. Scratch files are owned by the state value, so
//! they are released on drop whichever branch is taken. Steps run strictly
//! sequentially, each consuming the previous step's output file; there are
//! no retries and no timeouts on tool or store calls.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use tubely_core::config::PLAYBACK_URL_TTL_SECS;
use tubely_core::models::{Orientation, PlaybackRef, Video, VideoResponse};
use tubely_core::validation::{validate_content_type, VIDEO_CONTENT_TYPES};
use tubely_core::AppError;
use tubely_db::VideoRepository;
use tubely_media::{MediaTool, ScratchFile};
use tubely_storage::{allocate_key, Storage};

/// One in-flight upload, tagged by pipeline stage.
///
/// Scratch files ride inside the variant that owns them: exactly one
/// staged and one remuxed file exist at a time, and dropping the state
/// (normally or on abort) deletes whatever is still held.
pub enum IngestState {
    Received {
        video_id: Uuid,
        uploader: Uuid,
        media_type: String,
    },
    Validated {
        video: Video,
        media_type: String,
    },
    Staged {
        video: Video,
        staged: ScratchFile,
    },
    Remuxed {
        video: Video,
        remuxed: ScratchFile,
    },
    Classified {
        video: Video,
        remuxed: ScratchFile,
        orientation: Orientation,
    },
    Keyed {
        video: Video,
        remuxed: ScratchFile,
        key: String,
    },
    Stored {
        video: Video,
        reference: PlaybackRef,
    },
    Persisted {
        video_id: Uuid,
    },
    Responded {
        response: VideoResponse,
    },
}

impl IngestState {
    pub fn stage_name(&self) -> &'static str {
        match self {
            IngestState::Received { .. } => "received",
            IngestState::Validated { .. } => "validated",
            IngestState::Staged { .. } => "staged",
            IngestState::Remuxed { .. } => "remuxed",
            IngestState::Classified { .. } => "classified",
            IngestState::Keyed { .. } => "keyed",
            IngestState::Stored { .. } => "stored",
            IngestState::Persisted { .. } => "persisted",
            IngestState::Responded { .. } => "responded",
        }
    }
}

fn out_of_order(state: &IngestState, expected: &'static str) -> AppError {
    AppError::Internal(format!(
        "ingest transition applied to '{}' state, expected '{}'",
        state.stage_name(),
        expected
    ))
}

/// Sequences one upload through validate, stage, remux, classify, key,
/// store, persist, and respond.
pub struct IngestPipeline {
    videos: VideoRepository,
    storage: Arc<dyn Storage>,
    media_tool: Arc<dyn MediaTool>,
    max_upload_bytes: usize,
}

impl IngestPipeline {
    pub fn new(
        videos: VideoRepository,
        storage: Arc<dyn Storage>,
        media_tool: Arc<dyn MediaTool>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            videos,
            storage,
            media_tool,
            max_upload_bytes,
        }
    }

    /// Drive an upload from receipt to response.
    pub async fn run<S, E>(
        &self,
        video_id: Uuid,
        uploader: Uuid,
        media_type: &str,
        body: S,
    ) -> Result<VideoResponse, AppError>
    where
        S: Stream<Item = Result<Bytes, E>> + Send,
        E: Display,
    {
        let mut state = IngestState::Received {
            video_id,
            uploader,
            media_type: media_type.to_string(),
        };

        state = self.validate(state).await?;
        state = self.stage(state, body).await?;

        loop {
            match state {
                IngestState::Responded { response } => return Ok(response),
                other => state = self.advance(other).await?,
            }
        }
    }

    /// `Received → Validated`: the record exists and the uploader owns it.
    ///
    /// Runs before any multipart consumption or temp-file creation, so a
    /// non-owner never causes server-side side effects.
    pub async fn validate(&self, state: IngestState) -> Result<IngestState, AppError> {
        let IngestState::Received {
            video_id,
            uploader,
            media_type,
        } = state
        else {
            return Err(out_of_order(&state, "received"));
        };

        let video = self
            .videos
            .get(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        if video.user_id != uploader {
            return Err(AppError::Forbidden(
                "Only the video's owner may upload to it".to_string(),
            ));
        }

        Ok(IngestState::Validated { video, media_type })
    }

    /// `Validated → Staged`: declared type accepted, full stream copied
    /// into a scoped temporary file with the size ceiling enforced
    /// mid-copy.
    pub async fn stage<S, E>(&self, state: IngestState, body: S) -> Result<IngestState, AppError>
    where
        S: Stream<Item = Result<Bytes, E>> + Send,
        E: Display,
    {
        let IngestState::Validated { video, media_type } = state else {
            return Err(out_of_order(&state, "validated"));
        };

        validate_content_type(&media_type, VIDEO_CONTENT_TYPES)?;

        let staged = ScratchFile::create("tubely-upload", ".mp4")?;
        let mut file = tokio::fs::File::options()
            .write(true)
            .open(staged.path())
            .await?;

        let mut body = std::pin::pin!(body);
        let mut total: usize = 0;
        while let Some(chunk) = body.next().await {
            let chunk = chunk
                .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?;
            total += chunk.len();
            if total > self.max_upload_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "Upload exceeds {} bytes",
                    self.max_upload_bytes
                )));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        tracing::debug!(video_id = %video.id, size_bytes = total, "Upload staged");

        Ok(IngestState::Staged { video, staged })
    }

    /// Advance one step from `Staged` onward.
    pub async fn advance(&self, state: IngestState) -> Result<IngestState, AppError> {
        match state {
            IngestState::Staged { video, staged } => {
                // Staged file is released as soon as the remuxed one exists.
                let remuxed = self.media_tool.remux_faststart(staged.path()).await?;
                drop(staged);
                Ok(IngestState::Remuxed { video, remuxed })
            }

            IngestState::Remuxed { video, remuxed } => {
                let (width, height) = self.media_tool.probe_dimensions(remuxed.path()).await?;
                let orientation = Orientation::from_dimensions(width, height);
                tracing::debug!(
                    video_id = %video.id,
                    width,
                    height,
                    orientation = %orientation,
                    "Video classified"
                );
                Ok(IngestState::Classified {
                    video,
                    remuxed,
                    orientation,
                })
            }

            IngestState::Classified {
                video,
                remuxed,
                orientation,
            } => Ok(IngestState::Keyed {
                video,
                remuxed,
                key: allocate_key(orientation),
            }),

            IngestState::Keyed {
                video,
                remuxed,
                key,
            } => {
                let data = tokio::fs::read(remuxed.path()).await?;
                self.storage
                    .put(&key, Bytes::from(data), "video/mp4")
                    .await?;
                let reference = PlaybackRef::new(self.storage.bucket(), key);
                Ok(IngestState::Stored { video, reference })
            }

            IngestState::Stored { video, reference } => {
                if let Err(e) = self.videos.update_playback_ref(video.id, &reference).await {
                    // The object is now orphaned in the store; accepted,
                    // not compensated.
                    tracing::error!(
                        video_id = %video.id,
                        reference = %reference,
                        error = %e,
                        "Persisting playback reference failed; stored object orphaned"
                    );
                    return Err(e);
                }
                Ok(IngestState::Persisted { video_id: video.id })
            }

            IngestState::Persisted { video_id } => {
                let video = self
                    .videos
                    .get(video_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;
                let response = to_playable(video, self.storage.as_ref()).await?;
                Ok(IngestState::Responded { response })
            }

            other => Err(out_of_order(&other, "staged or later")),
        }
    }
}

/// Read-path translation: expand the stored `"<bucket>,<key>"` reference
/// into a presigned URL in the response copy only.
///
/// An absent reference passes through unchanged; a malformed one fails the
/// whole read. The stored record is never mutated.
pub async fn to_playable(video: Video, storage: &dyn Storage) -> Result<VideoResponse, AppError> {
    let reference = video.playback_ref()?;
    let mut response = VideoResponse::from(video);

    if let Some(reference) = reference {
        if reference.bucket != storage.bucket() {
            tracing::warn!(
                stored_bucket = %reference.bucket,
                configured_bucket = %storage.bucket(),
                "Stored playback reference names a different bucket"
            );
        }
        let url = storage
            .presign_get(&reference.key, Duration::from_secs(PLAYBACK_URL_TTL_SECS))
            .await?;
        response.video_url = Some(url);
    }

    Ok(response)
}
