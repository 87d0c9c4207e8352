//! Tubely storage library
//!
//! Object-store abstraction and implementations: the [`Storage`] trait, an
//! S3 backend, and an in-memory backend for tests and local development.
//!
//! # Object key format
//!
//! Video objects are keyed `"<orientation>/<43-char base64url-no-pad>"`,
//! orientation one of `landscape|portrait|other`. Key generation is
//! centralized in the `keys` module so the format stays consistent.

pub mod keys;
pub mod memory;
pub mod s3;
pub mod traits;

pub use keys::{allocate_key, allocate_thumbnail_key};
pub use memory::MemoryStorage;
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
