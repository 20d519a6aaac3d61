//! Configuration for remux backends.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::media::Container;

/// Remux backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemuxMode {
    /// ffmpeg stream copy, no decryption.
    Copy,
    /// ffmpeg with inline decryption keys (mp4 only).
    #[default]
    Ffmpeg,
    /// mp4decrypt followed by MP4Box.
    Mp4box,
    /// Shaka Packager decryption followed by an ffmpeg mux.
    Packager,
}

impl RemuxMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Ffmpeg => "ffmpeg",
            Self::Mp4box => "mp4box",
            Self::Packager => "packager",
        }
    }

    /// Whether this mode can decrypt keyed tracks in `container`.
    ///
    /// Nothing decrypts Ogg.
    pub fn accepts_key_for(&self, container: Container) -> bool {
        match self {
            Self::Copy => false,
            Self::Ffmpeg | Self::Mp4box => container == Container::Mp4,
            Self::Packager => matches!(container, Container::Mp4 | Container::Webm),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemuxConfig {
    /// Backend for audio items.
    #[serde(default)]
    pub audio_mode: RemuxMode,

    /// Backend for video items.
    #[serde(default)]
    pub video_mode: RemuxMode,

    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    #[serde(default = "default_mp4box_path")]
    pub mp4box_path: PathBuf,

    #[serde(default = "default_mp4decrypt_path")]
    pub mp4decrypt_path: PathBuf,

    #[serde(default = "default_packager_path")]
    pub packager_path: PathBuf,

    /// Ceiling for a single tool invocation, in seconds.
    #[serde(default = "default_watchdog")]
    pub watchdog_secs: u64,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_mp4box_path() -> PathBuf {
    PathBuf::from("MP4Box")
}

fn default_mp4decrypt_path() -> PathBuf {
    PathBuf::from("mp4decrypt")
}

fn default_packager_path() -> PathBuf {
    PathBuf::from("packager")
}

fn default_watchdog() -> u64 {
    3600 // 1 hour
}

impl Default for RemuxConfig {
    fn default() -> Self {
        Self {
            audio_mode: RemuxMode::default(),
            video_mode: RemuxMode::default(),
            ffmpeg_path: default_ffmpeg_path(),
            mp4box_path: default_mp4box_path(),
            mp4decrypt_path: default_mp4decrypt_path(),
            packager_path: default_packager_path(),
            watchdog_secs: default_watchdog(),
        }
    }
}
