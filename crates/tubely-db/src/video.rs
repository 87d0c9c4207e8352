//! Video metadata repository.
//!
//! Rows store ids and timestamps as TEXT for SQLite portability; the
//! repository converts to and from the domain `Video` model. The playback
//! reference column holds the durable `"<bucket>,<key>"` form, never a
//! signed URL.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Sqlite, SqlitePool};
use uuid::Uuid;

use tubely_core::models::{CreateVideoParams, PlaybackRef, Video};
use tubely_core::AppError;

#[derive(Debug, FromRow)]
struct VideoRow {
    id: String,
    user_id: String,
    title: String,
    description: String,
    video_url: Option<String>,
    thumbnail_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VideoRow {
    fn into_video(self) -> Result<Video, AppError> {
        Ok(Video {
            id: self.id.parse()?,
            user_id: self.user_id.parse()?,
            title: self.title,
            description: self.description,
            video_url: self.video_url,
            thumbnail_url: self.thumbnail_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for video records.
#[derive(Clone)]
pub struct VideoRepository {
    pool: SqlitePool,
}

impl VideoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a draft record owned by `user_id`. No playback reference yet.
    pub async fn create(
        &self,
        user_id: Uuid,
        params: CreateVideoParams,
    ) -> Result<Video, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO videos (id, user_id, title, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(&params.title)
        .bind(&params.description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Video {
            id,
            user_id,
            title: params.title,
            description: params.description,
            video_url: None,
            thumbnail_url: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let row: Option<VideoRow> = sqlx::query_as::<Sqlite, VideoRow>(
            "SELECT id, user_id, title, description, video_url, thumbnail_url, \
             created_at, updated_at FROM videos WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(VideoRow::into_video).transpose()
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let rows: Vec<VideoRow> = sqlx::query_as::<Sqlite, VideoRow>(
            "SELECT id, user_id, title, description, video_url, thumbnail_url, \
             created_at, updated_at FROM videos WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(VideoRow::into_video).collect()
    }

    /// Persist the durable playback reference after a successful upload.
    pub async fn update_playback_ref(
        &self,
        id: Uuid,
        reference: &PlaybackRef,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE videos SET video_url = ?, updated_at = ? WHERE id = ?")
            .bind(reference.to_string())
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", id)));
        }
        Ok(())
    }

    pub async fn update_thumbnail_url(&self, id: Uuid, url: &str) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE videos SET thumbnail_url = ?, updated_at = ? WHERE id = ?")
                .bind(url)
                .bind(Utc::now())
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", id)));
        }
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", id)));
        }
        Ok(())
    }
}
