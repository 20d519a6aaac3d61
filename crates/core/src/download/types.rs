//! Types for download jobs.

use std::path::PathBuf;

use crate::media::TrackSource;

/// One track to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    /// Item the track belongs to, for logging.
    pub item_id: String,
    pub source: TrackSource,
    /// Destination inside the item's scratch directory.
    pub destination: PathBuf,
}

impl DownloadJob {
    pub fn new(item_id: impl Into<String>, source: TrackSource, destination: PathBuf) -> Self {
        Self {
            item_id: item_id.into(),
            source,
            destination,
        }
    }
}

/// A completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub path: PathBuf,
    pub bytes: u64,
    pub segments: usize,
    pub duration_ms: u64,
}
