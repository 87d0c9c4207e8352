use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tubely_api::{build_router, server, AppState};
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_media::FfmpegMediaTool;
use tubely_storage::S3Storage;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = tubely_db::connect(&config.database_url)
        .await
        .context("Failed to open database")?;
    let videos = VideoRepository::new(pool);

    let storage = S3Storage::new(
        config.s3_bucket.clone(),
        config.s3_region.clone(),
        config.s3_endpoint.clone(),
    )
    .context("Failed to initialize S3 storage")?;

    let media_tool = FfmpegMediaTool::new(config.ffmpeg_path.clone(), config.ffprobe_path.clone())
        .context("Invalid media tool configuration")?;
    media_tool
        .preflight()
        .await
        .context("ffmpeg/ffprobe not runnable")?;

    let state = Arc::new(AppState::new(
        config.clone(),
        videos,
        Arc::new(storage),
        Arc::new(media_tool),
    ));
    let app = build_router(state);

    server::start_server(&config, app).await
}
