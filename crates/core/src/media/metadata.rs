//! Descriptive metadata for a leaf item.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::types::{MediaKind, PlaylistContext};

/// Content advisory rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaRating {
    #[default]
    None,
    Explicit,
    Clean,
}

impl MediaRating {
    /// Text used in path templates; `None` has no label.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Explicit => Some("explicit"),
            Self::Clean => Some("clean"),
        }
    }

    /// Numeric value used by the `rating` tag.
    pub fn tag_value(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Explicit => 1,
            Self::Clean => 2,
        }
    }
}

/// Cover art variant, smallest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoverSize {
    Small,
    Medium,
    Large,
    #[default]
    ExtraLarge,
}

impl CoverSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extra-large",
        }
    }
}

impl fmt::Display for CoverSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "extra-large" => Ok(Self::ExtraLarge),
            other => Err(format!(
                "unknown cover size '{}' (expected small, medium, large or extra-large)",
                other
            )),
        }
    }
}

/// One timed lyrics line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsLine {
    pub start_ms: u64,
    pub text: String,
}

/// Lyrics as delivered by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
    /// Untimed text, if the catalog has it.
    #[serde(default)]
    pub plain: Option<String>,
    /// Timed lines, empty when the lyrics are not synced.
    #[serde(default)]
    pub synced: Vec<LyricsLine>,
}

impl Lyrics {
    pub fn is_empty(&self) -> bool {
        self.plain.is_none() && self.synced.is_empty()
    }

    pub fn has_synced(&self) -> bool {
        !self.synced.is_empty()
    }

    /// Plain text, falling back to the text of the synced lines.
    pub fn plain_text(&self) -> Option<String> {
        if let Some(plain) = &self.plain {
            return Some(plain.clone());
        }
        if self.synced.is_empty() {
            return None;
        }
        let mut text = self
            .synced
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        text.push('\n');
        Some(text)
    }

    /// Renders the synced lines as LRC, `[mm:ss.cc]text` per line.
    pub fn to_lrc(&self) -> Option<String> {
        if self.synced.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .synced
            .iter()
            .map(|line| format!("[{}]{}", lrc_timestamp(line.start_ms), line.text))
            .collect();
        Some(lines.join("\n"))
    }
}

fn lrc_timestamp(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let centis = (ms % 1000) / 10;
    format!("{:02}:{:02}.{:02}", minutes, seconds, centis)
}

/// Joins names as `A`, `A & B` or `A, B & C`.
pub(crate) fn format_names(names: &[String]) -> Option<String> {
    match names {
        [] => None,
        [only] => Some(only.clone()),
        [first, second] => Some(format!("{} & {}", first, second)),
        [rest @ .., last] => Some(format!("{} & {}", rest.join(", "), last)),
    }
}

/// Descriptive record for one leaf item.
///
/// Fields the catalog does not provide stay `None`; the template engine
/// substitutes fallbacks for path rendering and the tag mapper omits them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub media_id: String,
    pub kind: Option<MediaKind>,
    pub title: Option<String>,
    /// Track artists in credit order.
    pub artists: Vec<String>,
    pub album: Option<String>,
    /// Album artists in credit order.
    pub album_artists: Vec<String>,
    pub composer: Option<String>,
    pub producer: Option<String>,
    pub publisher: Option<String>,
    pub label: Option<String>,
    pub copyright: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub isrc: Option<String>,
    pub url: Option<String>,
    pub disc: Option<u32>,
    pub disc_total: Option<u32>,
    pub track: Option<u32>,
    pub track_total: Option<u32>,
    pub compilation: bool,
    pub rating: MediaRating,
    pub date: Option<NaiveDate>,
    pub lyrics: Lyrics,
    pub cover_url: Option<String>,
    /// Cover URLs per size, when the catalog offers several.
    pub cover_urls: BTreeMap<CoverSize, String>,
    pub playlist_id: Option<String>,
    pub playlist_title: Option<String>,
    pub playlist_artist: Option<String>,
    pub playlist_track: Option<u32>,
    pub playlist_track_total: Option<u32>,
}

impl Metadata {
    /// Formatted track artist credit.
    pub fn artist(&self) -> Option<String> {
        format_names(&self.artists)
    }

    /// Formatted album artist credit.
    pub fn album_artist(&self) -> Option<String> {
        format_names(&self.album_artists)
    }

    /// Whether the item belongs to an album.
    pub fn has_album(&self) -> bool {
        self.album.is_some()
    }

    /// Whether the item spans more than one disc.
    pub fn is_multi_disc(&self) -> bool {
        self.disc_total.map(|n| n > 1).unwrap_or(false)
    }

    /// Cover URL for `size`.
    ///
    /// Falls back to the largest smaller variant, then to `cover_url`, then
    /// to the smallest larger variant.
    pub fn cover_url_for(&self, size: CoverSize) -> Option<&str> {
        self.cover_urls
            .range(..=size)
            .next_back()
            .map(|(_, url)| url.as_str())
            .or(self.cover_url.as_deref())
            .or_else(|| self.cover_urls.values().next().map(String::as_str))
    }

    /// Copies playlist position into the playlist fields.
    pub fn apply_playlist(&mut self, playlist: &PlaylistContext) {
        self.playlist_id = Some(playlist.id.clone());
        self.playlist_title = Some(playlist.title.clone());
        self.playlist_artist = Some(playlist.artist.clone());
        self.playlist_track = Some(playlist.track);
        self.playlist_track_total = Some(playlist.track_total);
    }
}
