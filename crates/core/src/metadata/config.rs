//! Configuration for tagging.

use serde::{Deserialize, Serialize};

use crate::media::CoverSize;

/// What to embed as the `lyrics` tag when no synced lyrics exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LyricsFallback {
    /// Embed the catalog's plain lyrics.
    #[default]
    Plain,
    /// Embed nothing.
    None,
}

/// Tag writing options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagConfig {
    /// Tag keys left out of the written tag set. `all` disables tagging and
    /// `cover` disables cover embedding.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub lyrics_fallback: LyricsFallback,

    /// Write synced lyrics next to the media file as `.lrc`.
    #[serde(default = "default_true")]
    pub synced_lyrics_file: bool,

    /// Cover variant to fetch for embedding and sibling files.
    #[serde(default)]
    pub cover_size: CoverSize,
}

fn default_true() -> bool {
    true
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            lyrics_fallback: LyricsFallback::default(),
            synced_lyrics_file: default_true(),
            cover_size: CoverSize::default(),
        }
    }
}

impl TagConfig {
    pub fn with_exclude(mut self, keys: &[&str]) -> Self {
        self.exclude = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Whether `key` is excluded, directly or through `all`.
    pub fn excludes(&self, key: &str) -> bool {
        self.exclude
            .iter()
            .any(|k| k.eq_ignore_ascii_case(key) || k.eq_ignore_ascii_case("all"))
    }
}
