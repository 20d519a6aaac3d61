//! Catalog item identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::stream::StreamDescriptor;

/// Type of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    Song,
    Album,
    Playlist,
    PodcastEpisode,
    PodcastSeries,
    MusicVideo,
    PodcastVideo,
    Artist,
}

impl MediaKind {
    /// Whether this kind is processed by the item pipeline directly.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Song | Self::PodcastEpisode | Self::MusicVideo | Self::PodcastVideo
        )
    }

    /// Whether items of this kind carry a video track.
    pub fn is_video(&self) -> bool {
        matches!(self, Self::MusicVideo | Self::PodcastVideo)
    }

    /// Whether items of this kind belong to a podcast.
    pub fn is_podcast(&self) -> bool {
        matches!(
            self,
            Self::PodcastEpisode | Self::PodcastSeries | Self::PodcastVideo
        )
    }

    /// Whether synced lyrics are looked up for this kind.
    pub fn has_lyrics(&self) -> bool {
        matches!(self, Self::Song | Self::PodcastEpisode)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Song => "song",
            Self::Album => "album",
            Self::Playlist => "playlist",
            Self::PodcastEpisode => "podcast-episode",
            Self::PodcastSeries => "podcast-series",
            Self::MusicVideo => "music-video",
            Self::PodcastVideo => "podcast-video",
            Self::Artist => "artist",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of an item inside the playlist it was requested through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistContext {
    /// Catalog id of the playlist.
    pub id: String,
    pub title: String,
    /// Owner display name.
    pub artist: String,
    /// 1-based position of the item in the playlist.
    pub track: u32,
    pub track_total: u32,
}

/// A resolved catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Catalog id.
    pub id: String,
    pub kind: MediaKind,
    /// Display label used in logs and reports.
    #[serde(default)]
    pub label: Option<String>,
    /// Resolved children for container kinds.
    #[serde(default)]
    pub children: Vec<MediaItem>,
    /// Set when the item was reached through a playlist.
    #[serde(default)]
    pub playlist: Option<PlaylistContext>,
    /// The stream bound by quality negotiation.
    #[serde(skip)]
    pub stream: Option<StreamDescriptor>,
}

impl MediaItem {
    /// Creates a leaf or container item with no children.
    pub fn new(id: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            kind,
            label: None,
            children: Vec::new(),
            playlist: None,
            stream: None,
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attaches playlist context.
    pub fn with_playlist(mut self, playlist: PlaylistContext) -> Self {
        self.playlist = Some(playlist);
        self
    }

    /// Attaches children.
    pub fn with_children(mut self, children: Vec<MediaItem>) -> Self {
        self.children = children;
        self
    }

    /// Label for logs, falling back to `kind:id`.
    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("{}:{}", self.kind, self.id),
        }
    }

    /// Whether the bound stream requires a license. False before binding.
    pub fn is_drm(&self) -> bool {
        self.stream
            .as_ref()
            .map(StreamDescriptor::is_drm)
            .unwrap_or(false)
    }

    /// Flattens this item into its leaf items, depth first.
    pub fn leaves(self) -> Vec<MediaItem> {
        if self.kind.is_leaf() {
            return vec![self];
        }
        self.children
            .into_iter()
            .flat_map(MediaItem::leaves)
            .collect()
    }
}
