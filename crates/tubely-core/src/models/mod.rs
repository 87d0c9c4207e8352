//! Domain models.

pub mod orientation;
pub mod video;

pub use orientation::Orientation;
pub use video::{CreateVideoParams, PlaybackRef, Video, VideoResponse};
