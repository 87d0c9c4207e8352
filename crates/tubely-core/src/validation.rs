//! Upload request validation helpers.

use crate::error::AppError;

/// Content types accepted by the video upload endpoint.
pub const VIDEO_CONTENT_TYPES: &[&str] = &["video/mp4"];

/// Content types accepted by the thumbnail upload endpoint.
pub const THUMBNAIL_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Check a declared content type against an endpoint allow-list.
///
/// Exact string match only; the body is never sniffed. A mismatch is the
/// caller's fault and reported as invalid input.
pub fn validate_content_type(declared: &str, allowed: &[&str]) -> Result<(), AppError> {
    if allowed.contains(&declared) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Content type '{}' not allowed; expected one of: {}",
            declared,
            allowed.join(", ")
        )))
    }
}

/// File extension for an accepted thumbnail content type.
pub fn thumbnail_extension(content_type: &str) -> Result<&'static str, AppError> {
    match content_type {
        "image/jpeg" => Ok("jpg"),
        "image/png" => Ok("png"),
        other => Err(AppError::InvalidInput(format!(
            "No known extension for content type '{}'",
            other
        ))),
    }
}
