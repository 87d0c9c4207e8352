//! Configuration module
//!
//! Environment-driven configuration for the API server, storage backend,
//! and external media tools.

use std::env;

const DEFAULT_PORT: u16 = 8091;
const DEFAULT_DATABASE_URL: &str = "sqlite:tubely.db";
const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";
const DEFAULT_FFPROBE_PATH: &str = "ffprobe";

/// Default ceiling for video uploads: 1 GiB.
pub const MAX_VIDEO_UPLOAD_BYTES: usize = 1 << 30;
/// Default ceiling for thumbnail uploads: 10 MiB.
pub const MAX_THUMBNAIL_UPLOAD_BYTES: usize = 10 << 20;
/// Lifetime of presigned playback URLs.
pub const PLAYBACK_URL_TTL_SECS: u64 = 5;

/// Application configuration loaded from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub s3_bucket: String,
    pub s3_region: String,
    /// Custom endpoint for S3-compatible providers (MinIO etc.)
    pub s3_endpoint: Option<String>,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub max_video_upload_bytes: usize,
    pub max_thumbnail_upload_bytes: usize,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // Missing .env is fine; real deployments set vars directly.
        let _ = dotenvy::dotenv();

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let s3_bucket =
            env::var("S3_BUCKET").map_err(|_| anyhow::anyhow!("S3_BUCKET must be set"))?;

        Ok(Config {
            server_port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            environment: env::var("ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .unwrap_or_else(|_| "development".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            s3_bucket,
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| DEFAULT_FFMPEG_PATH.to_string()),
            ffprobe_path: env::var("FFPROBE_PATH")
                .unwrap_or_else(|_| DEFAULT_FFPROBE_PATH.to_string()),
            max_video_upload_bytes: env::var("MAX_VIDEO_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_VIDEO_UPLOAD_BYTES),
            max_thumbnail_upload_bytes: env::var("MAX_THUMBNAIL_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_THUMBNAIL_UPLOAD_BYTES),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
