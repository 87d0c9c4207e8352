//! Tubely media library
//!
//! External media-tool capability: the [`MediaTool`] trait with its
//! ffmpeg/ffprobe subprocess implementation, scratch-file handling for
//! in-flight uploads, and ffprobe output parsing.

pub mod probe;
pub mod scratch;
pub mod tool;

pub use probe::ProbeOutput;
pub use scratch::ScratchFile;
pub use tool::{FfmpegMediaTool, MediaTool, MediaToolError};
