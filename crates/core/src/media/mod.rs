//! Media model shared by every pipeline stage.
//!
//! A [`MediaItem`] is what the catalog resolves a URL into. Leaf items
//! (songs, episodes, videos) flow through the item pipeline one at a time;
//! container items (albums, playlists, shows, artists) only carry children.
//!
//! A [`StreamDescriptor`] is one concrete encoding of a leaf item, and
//! [`Metadata`] is the descriptive record used for tagging and paths.

mod metadata;
mod stream;
mod types;
mod url;

pub use metadata::{CoverSize, Lyrics, LyricsLine, MediaRating, Metadata};
pub use stream::{
    AudioQuality, Container, DrmInfo, StreamDescriptor, TrackSource, VideoFormat,
    VideoResolution,
};
pub use types::{MediaItem, MediaKind, PlaylistContext};
pub use url::{parse_media_url, MediaUrl};
