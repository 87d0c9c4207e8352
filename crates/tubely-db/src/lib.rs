//! Tubely database library
//!
//! SQLite-backed metadata store for video records. Repositories take an
//! explicit pool; there are no process-wide handles.

pub mod video;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tubely_core::AppError;

pub use video::VideoRepository;

/// Embedded migrations (see the `migrations/` directory).
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Open a connection pool and bring the schema up to date.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(AppError::from)?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;

    tracing::info!(database_url = %database_url, "Database ready");
    Ok(pool)
}
