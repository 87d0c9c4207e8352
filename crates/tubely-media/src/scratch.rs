//! Scratch files for in-flight uploads.
//!
//! A staged upload and its remuxed derivative are both request-scoped
//! temporary files. Wrapping them in an owned type ties deletion to drop,
//! so every exit path (success, validation failure, tool failure, store
//! failure) releases them without manual path tracking.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// An exclusively-owned temporary file, deleted (best-effort) on drop.
#[derive(Debug)]
pub struct ScratchFile {
    path: TempPath,
}

impl ScratchFile {
    /// Create a fresh empty scratch file in the system temp directory.
    pub fn create(prefix: &str, suffix: &str) -> io::Result<ScratchFile> {
        let file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile()?;
        Ok(ScratchFile {
            path: file.into_temp_path(),
        })
    }

    /// Take ownership of a file some external tool already wrote (or is
    /// expected to write). The file need not exist yet; only an empty
    /// path or an unresolvable relative path is rejected.
    pub fn adopt(path: PathBuf) -> io::Result<ScratchFile> {
        Ok(ScratchFile {
            path: TempPath::try_from_path(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleted_on_drop() {
        let scratch = ScratchFile::create("tubely-test", ".mp4").unwrap();
        let path = scratch.path().to_path_buf();
        assert!(path.exists());
        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn adopted_file_deleted_on_drop() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("tubely-adopt-{}.mp4", std::process::id()));
        std::fs::write(&path, b"x").unwrap();
        let scratch = ScratchFile::adopt(path.clone()).unwrap();
        assert!(scratch.path().exists());
        drop(scratch);
        assert!(!path.exists());
    }
}
