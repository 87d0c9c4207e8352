//! In-memory storage backend.
//!
//! Used by tests and local development in place of S3. Presigned URLs are
//! fakes that embed the bucket, key, and expiry so callers can assert on
//! them; they grant nothing.

use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    data: Bytes,
}

/// In-memory implementation of [`Storage`].
#[derive(Clone)]
pub struct MemoryStorage {
    bucket: String,
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl MemoryStorage {
    pub fn new(bucket: impl Into<String>) -> Self {
        MemoryStorage {
            bucket: bucket.into(),
            objects: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.lock().expect("storage lock poisoned").len()
    }

    /// Whether an object exists under the key.
    pub fn contains(&self, key: &str) -> bool {
        self.objects
            .lock()
            .expect("storage lock poisoned")
            .contains_key(key)
    }

    /// Fetch an object's bytes and content type, if present.
    pub fn get(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects
            .lock()
            .expect("storage lock poisoned")
            .get(key)
            .map(|o| (o.data.clone(), o.content_type.clone()))
    }

    /// All stored keys, unordered.
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .expect("storage lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::UploadFailed("empty key".to_string()));
        }
        self.objects.lock().expect("storage lock poisoned").insert(
            key.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                data,
            },
        );
        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        if !self.contains(key) {
            return Err(StorageError::NotFound(key.to_string()));
        }
        Ok(format!(
            "https://{}.s3.example.com/{}?X-Amz-Expires={}&X-Amz-Signature=memory",
            self.bucket,
            key,
            expires_in.as_secs()
        ))
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://{}.s3.example.com/{}", self.bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_presign() {
        let storage = MemoryStorage::new("test-bucket");
        storage
            .put("landscape/abc", Bytes::from_static(b"data"), "video/mp4")
            .await
            .unwrap();

        let url = storage
            .presign_get("landscape/abc", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(url.contains("test-bucket"));
        assert!(url.contains("landscape/abc"));
        assert!(url.contains("X-Amz-Expires=5"));
    }

    #[tokio::test]
    async fn presign_missing_object_fails() {
        let storage = MemoryStorage::new("test-bucket");
        let err = storage
            .presign_get("nope", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
