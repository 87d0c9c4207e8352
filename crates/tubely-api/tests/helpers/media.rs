//! Deterministic media tool fake.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use tubely_media::{MediaTool, MediaToolError, ScratchFile};

enum FakeProbe {
    Dimensions(u32, u32),
    NoStream,
}

/// Media tool that copies instead of remuxing and reports fixed
/// dimensions instead of probing.
pub struct FakeMediaTool {
    probe: FakeProbe,
}

impl FakeMediaTool {
    pub fn landscape() -> Self {
        FakeMediaTool {
            probe: FakeProbe::Dimensions(1920, 1080),
        }
    }

    pub fn portrait() -> Self {
        FakeMediaTool {
            probe: FakeProbe::Dimensions(1080, 1920),
        }
    }

    pub fn square() -> Self {
        FakeMediaTool {
            probe: FakeProbe::Dimensions(720, 720),
        }
    }

    pub fn no_video_stream() -> Self {
        FakeMediaTool {
            probe: FakeProbe::NoStream,
        }
    }
}

#[async_trait]
impl MediaTool for FakeMediaTool {
    async fn remux_faststart(&self, input: &Path) -> Result<ScratchFile, MediaToolError> {
        let mut raw = input.as_os_str().to_owned();
        raw.push(".processing");
        let output = PathBuf::from(raw);
        tokio::fs::copy(input, &output).await?;
        Ok(ScratchFile::adopt(output)?)
    }

    async fn probe_dimensions(&self, _input: &Path) -> Result<(u32, u32), MediaToolError> {
        match self.probe {
            FakeProbe::Dimensions(width, height) => Ok((width, height)),
            FakeProbe::NoStream => Err(MediaToolError::NoVideoStream),
        }
    }
}
