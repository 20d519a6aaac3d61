//! Types for remux jobs.

use std::path::{Path, PathBuf};

use super::error::RemuxError;
use crate::license::LicenseKey;
use crate::media::StreamDescriptor;

/// Inputs and output of one remux.
#[derive(Debug)]
pub struct RemuxJob {
    pub item_id: String,
    /// The bound stream the inputs were downloaded from.
    pub stream: StreamDescriptor,
    pub audio_input: PathBuf,
    pub video_input: Option<PathBuf>,
    /// Consumed by this job and dropped with it.
    pub key: Option<LicenseKey>,
    /// Scratch directory for intermediate files.
    pub work_dir: PathBuf,
    /// Finished file, inside `work_dir`.
    pub output: PathBuf,
}

impl RemuxJob {
    pub fn inputs(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.audio_input.as_path()).chain(self.video_input.as_deref())
    }

    /// Scratch path for an intermediate derived from `input`.
    pub(crate) fn intermediate(&self, input: &Path, tag: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "track".to_string());
        let ext = input
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| self.stream.container.extension().to_string());
        self.work_dir.join(format!("{}_{}.{}", stem, tag, ext))
    }
}

/// A finished remux.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemuxResult {
    pub output: PathBuf,
    pub decrypted: bool,
    pub duration_ms: u64,
}

/// Fails unless `path` exists and is non-empty.
pub(crate) async fn ensure_output(path: &Path) -> Result<(), RemuxError> {
    match tokio::fs::metadata(path).await {
        Ok(m) if m.len() > 0 => Ok(()),
        _ => Err(RemuxError::remux_failed(
            format!("no output produced at {}", path.display()),
            None,
        )),
    }
}
