//! HTTP request handlers.

pub mod thumbnail_upload;
pub mod video_upload;
pub mod videos;

use axum::extract::multipart::{Field, MultipartError};
use bytes::Bytes;
use futures::Stream;
use tubely_core::AppError;

pub(crate) fn multipart_read_error(err: MultipartError) -> AppError {
    AppError::InvalidInput(format!("Failed to read multipart body: {}", err))
}

pub(crate) fn missing_field(name: &str) -> AppError {
    AppError::InvalidInput(format!("No '{}' file field in request", name))
}

/// Adapt a multipart field into a chunk stream for the ingest pipeline.
pub(crate) fn field_stream(
    field: Field<'_>,
) -> impl Stream<Item = Result<Bytes, MultipartError>> + '_ {
    futures::stream::try_unfold(field, |mut field| async move {
        Ok(field.chunk().await?.map(|chunk| (chunk, field)))
    })
}
