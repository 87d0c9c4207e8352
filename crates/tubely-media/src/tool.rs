//! External media tool capability.
//!
//! Remux and probe are modeled as an injectable trait rather than
//! hard-wired process execution, so tests can substitute deterministic
//! fixtures for the subprocess-backed implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::probe::ProbeOutput;
use crate::scratch::ScratchFile;
use tubely_core::AppError;

/// Suffix appended to the staged path to derive the remux output path.
const REMUX_SUFFIX: &str = ".processing";

#[derive(Debug, thiserror::Error)]
pub enum MediaToolError {
    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("No video stream found")]
    NoVideoStream,

    #[error("Malformed probe output: {0}")]
    MalformedProbeOutput(String),

    #[error("Invalid tool path: {0}")]
    InvalidToolPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MediaToolError> for AppError {
    fn from(err: MediaToolError) -> Self {
        AppError::Processing(err.to_string())
    }
}

/// Media tool capability: container remux and stream probing.
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Copy all streams into a new MPEG-4 container with the `moov` atom
    /// relocated to the front, enabling playback before full download.
    /// The output path is the input path plus a fixed suffix; any partial
    /// output from an earlier attempt is cleared before invocation.
    async fn remux_faststart(&self, input: &Path) -> Result<ScratchFile, MediaToolError>;

    /// Width and height of the first video stream in the file.
    async fn probe_dimensions(&self, input: &Path) -> Result<(u32, u32), MediaToolError>;
}

/// Validate that a tool path doesn't contain shell metacharacters.
fn validate_tool_path(path: &str) -> Result<(), MediaToolError> {
    let ok = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '\\'));
    if ok {
        Ok(())
    } else {
        Err(MediaToolError::InvalidToolPath(path.to_string()))
    }
}

/// Subprocess-backed implementation invoking ffmpeg and ffprobe.
pub struct FfmpegMediaTool {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegMediaTool {
    pub fn new(ffmpeg_path: String, ffprobe_path: String) -> Result<Self, MediaToolError> {
        validate_tool_path(&ffmpeg_path)?;
        validate_tool_path(&ffprobe_path)?;
        Ok(FfmpegMediaTool {
            ffmpeg_path,
            ffprobe_path,
        })
    }

    /// Verify both tools can be spawned. A missing binary is a startup
    /// failure, not a per-request one.
    pub async fn preflight(&self) -> Result<(), MediaToolError> {
        for tool in [&self.ffmpeg_path, &self.ffprobe_path] {
            Command::new(tool)
                .arg("-version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await?;
        }
        Ok(())
    }

    fn remux_output_path(input: &Path) -> PathBuf {
        let mut raw = input.as_os_str().to_owned();
        raw.push(REMUX_SUFFIX);
        PathBuf::from(raw)
    }
}

#[async_trait]
impl MediaTool for FfmpegMediaTool {
    #[tracing::instrument(skip(self, input))]
    async fn remux_faststart(&self, input: &Path) -> Result<ScratchFile, MediaToolError> {
        let output_path = Self::remux_output_path(input);

        // A previous failed attempt may have left partial output; the
        // remux is not retry-safe against the same path otherwise.
        match tokio::fs::remove_file(&output_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let start = std::time::Instant::now();
        let result = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&output_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        // Adopt before the status check so a partial file is removed on drop.
        let output = ScratchFile::adopt(output_path)?;

        if !result.status.success() {
            return Err(MediaToolError::ToolFailed {
                tool: "ffmpeg",
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        tracing::info!(
            input = %input.display(),
            output = %output.path().display(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Remux completed"
        );

        Ok(output)
    }

    #[tracing::instrument(skip(self, input))]
    async fn probe_dimensions(&self, input: &Path) -> Result<(u32, u32), MediaToolError> {
        let result = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(input)
            .output()
            .await?;

        if !result.status.success() {
            return Err(MediaToolError::ToolFailed {
                tool: "ffprobe",
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        let probe = ProbeOutput::parse(&result.stdout)?;
        let (width, height) = probe.first_video_dimensions()?;

        tracing::debug!(
            input = %input.display(),
            width,
            height,
            "Probe completed"
        );

        Ok((width, height))
    }
}
