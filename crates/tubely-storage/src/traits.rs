//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Presign failed: {0}")]
    PresignFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for tubely_core::AppError {
    fn from(err: StorageError) -> Self {
        tubely_core::AppError::Storage(err.to_string())
    }
}

/// Storage abstraction trait
///
/// A backend is bound to a single bucket at construction. Uploaded objects
/// are immediately readable on success; partial uploads are rejected by
/// the backend atomically, so no cleanup is attempted on failure.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Name of the bucket this backend writes to.
    fn bucket(&self) -> &str;

    /// Upload an object under the given key.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()>;

    /// Generate a presigned GET URL granting time-bounded read access
    /// without further authentication. Valid for exactly `expires_in`
    /// from issuance, non-renewable, non-revocable before expiry.
    async fn presign_get(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Stable public URL for an object (used for thumbnails, which are
    /// not access-controlled).
    fn public_url(&self, key: &str) -> String;
}
