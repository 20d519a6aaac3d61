//! Output and scratch-space configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where items are written and how existing files are treated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root of the output tree.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Root for per-item scratch directories.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Replace existing files instead of skipping the item.
    #[serde(default)]
    pub overwrite: bool,

    /// Write cover art as a sibling file.
    #[serde(default)]
    pub save_cover: bool,

    /// Maintain per-playlist `.m3u8` files.
    #[serde(default)]
    pub save_playlist: bool,

    /// Verify sha256 after placing each file.
    #[serde(default)]
    pub verify_checksum: bool,

    /// Only write synced lyrics files; no stream is downloaded.
    #[serde(default)]
    pub synced_lyrics_only: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./Media")
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("spindle")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            temp_dir: default_temp_dir(),
            overwrite: false,
            save_cover: false,
            save_playlist: false,
            verify_checksum: false,
            synced_lyrics_only: false,
        }
    }
}

impl OutputConfig {
    pub fn with_dirs(mut self, output_dir: impl Into<PathBuf>, temp_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self.temp_dir = temp_dir.into();
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}
