//! ffprobe output parsing.
//!
//! ffprobe is invoked with `-print_format json -show_streams`; the output
//! carries a `streams` array whose entries have integer `width`/`height`
//! for video streams.

use serde::Deserialize;

use crate::tool::MediaToolError;

/// Top-level ffprobe JSON document.
#[derive(Debug, Deserialize)]
pub struct ProbeOutput {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

/// One stream entry. Non-video streams may omit dimensions.
#[derive(Debug, Deserialize)]
pub struct ProbeStream {
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(default)]
    pub codec_type: Option<String>,
}

impl ProbeOutput {
    /// Parse raw ffprobe stdout.
    pub fn parse(raw: &[u8]) -> Result<ProbeOutput, MediaToolError> {
        serde_json::from_slice(raw)
            .map_err(|e| MediaToolError::MalformedProbeOutput(e.to_string()))
    }

    /// Width and height of the first video stream.
    ///
    /// Errors when the stream list is empty or the first stream lacks
    /// dimensions; no orientation is ever guessed from a failed probe.
    pub fn first_video_dimensions(&self) -> Result<(u32, u32), MediaToolError> {
        let stream = self.streams.first().ok_or(MediaToolError::NoVideoStream)?;
        match (stream.width, stream.height) {
            (Some(w), Some(h)) => Ok((w, h)),
            _ => Err(MediaToolError::MalformedProbeOutput(
                "first stream has no width/height".to_string(),
            )),
        }
    }
}
