//! Test helpers: build the app against in-memory collaborators.
//!
//! Run with `cargo test -p tubely-api`. The database is an in-memory
//! SQLite pool, storage is [`MemoryStorage`], and the media tool is a
//! deterministic fake, so tests need neither AWS credentials nor ffmpeg.

#![allow(dead_code)]

pub mod media;

use axum_test::TestServer;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use tubely_api::{auth, build_router, AppState};
use tubely_core::config::{MAX_THUMBNAIL_UPLOAD_BYTES, MAX_VIDEO_UPLOAD_BYTES};
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_media::MediaTool;
use tubely_storage::MemoryStorage;

pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long";
pub const TEST_BUCKET: &str = "tubely-videos";

/// Test application: server plus direct handles to the collaborators so
/// tests can assert on durable state behind the HTTP surface.
pub struct TestApp {
    pub server: TestServer,
    pub videos: VideoRepository,
    pub storage: MemoryStorage,
}

impl TestApp {
    pub fn bearer(&self, user_id: Uuid) -> String {
        let token = auth::issue_token(user_id, TEST_JWT_SECRET, chrono::Duration::hours(1))
            .expect("token signing");
        format!("Bearer {}", token)
    }
}

pub fn test_config() -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        s3_bucket: TEST_BUCKET.to_string(),
        s3_region: "us-east-1".to_string(),
        s3_endpoint: None,
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        max_video_upload_bytes: MAX_VIDEO_UPLOAD_BYTES,
        max_thumbnail_upload_bytes: MAX_THUMBNAIL_UPLOAD_BYTES,
    }
}

/// Build the app with the given media tool fake.
pub async fn setup_app(media_tool: Arc<dyn MediaTool>) -> TestApp {
    setup_app_with_config(test_config(), media_tool).await
}

/// Build the app with an explicit config (small upload ceilings etc.).
pub async fn setup_app_with_config(config: Config, media_tool: Arc<dyn MediaTool>) -> TestApp {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    tubely_db::MIGRATOR.run(&pool).await.expect("migrations");

    let videos = VideoRepository::new(pool);
    let storage = MemoryStorage::new(TEST_BUCKET);

    let state = Arc::new(AppState::new(
        config,
        videos.clone(),
        Arc::new(storage.clone()),
        media_tool,
    ));
    let server = TestServer::new(build_router(state)).expect("test server");

    TestApp {
        server,
        videos,
        storage,
    }
}

/// App whose media tool reports every video as 1920x1080.
pub async fn setup_landscape_app() -> TestApp {
    setup_app(Arc::new(media::FakeMediaTool::landscape())).await
}
