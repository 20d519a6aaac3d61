//! Configuration for quality negotiation.

use serde::{Deserialize, Serialize};

use crate::media::{AudioQuality, VideoFormat, VideoResolution};

/// How the final stream is picked among the eligible ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Apply the tier/resolution rules.
    #[default]
    Auto,
    /// Ask the operator whenever more than one stream is eligible.
    Ask,
}

/// Requested quality and entitlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityConfig {
    #[serde(default = "default_audio_quality")]
    pub audio_quality: AudioQuality,

    #[serde(default)]
    pub video_format: VideoFormat,

    /// Highest resolution to pick when available.
    #[serde(default)]
    pub video_resolution: VideoResolution,

    /// Whether the account is entitled to premium tiers.
    #[serde(default)]
    pub premium: bool,

    /// Whether DRM-protected candidates are eligible at all.
    #[serde(default = "default_allow_drm")]
    pub allow_drm: bool,

    #[serde(default)]
    pub selection: SelectionMode,

    /// Download a song's music-video version when the catalog has one.
    #[serde(default)]
    pub prefer_video: bool,
}

fn default_audio_quality() -> AudioQuality {
    AudioQuality::AacMedium
}

fn default_allow_drm() -> bool {
    true
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            audio_quality: default_audio_quality(),
            video_format: VideoFormat::default(),
            video_resolution: VideoResolution::default(),
            premium: false,
            allow_drm: default_allow_drm(),
            selection: SelectionMode::default(),
            prefer_video: false,
        }
    }
}

impl QualityConfig {
    pub fn with_audio_quality(mut self, quality: AudioQuality) -> Self {
        self.audio_quality = quality;
        self
    }

    pub fn with_premium(mut self, premium: bool) -> Self {
        self.premium = premium;
        self
    }

    pub fn with_selection(mut self, selection: SelectionMode) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_prefer_video(mut self, prefer: bool) -> Self {
        self.prefer_video = prefer;
        self
    }

    /// Whether audio items go through the chooser.
    pub fn asks_for_audio(&self) -> bool {
        self.selection == SelectionMode::Ask
    }

    /// Whether video items go through the chooser.
    pub fn asks_for_video(&self) -> bool {
        self.selection == SelectionMode::Ask || self.video_format == VideoFormat::Ask
    }
}
