//! Testing utilities and mock implementations.
//!
//! Every collaborator seam of the item pipeline has an in-memory mock
//! here, so pipeline and batch tests run against a real temp directory
//! without network access or external tools.
//!
//! # Example
//!
//! ```rust,ignore
//! use spindle_core::testing::{fixtures, MockCatalog, MockDownloader};
//!
//! let catalog = MockCatalog::new();
//! catalog
//!     .set_streams("t1", vec![fixtures::audio_stream("s1", AudioQuality::AacMedium, 128)])
//!     .await;
//! catalog.set_metadata("t1", fixtures::song_metadata("t1", "Song", 3)).await;
//! ```

mod mock_catalog;
mod mock_chooser;
mod mock_downloader;
mod mock_license;
mod mock_remuxer;
mod mock_tagger;

pub use mock_catalog::MockCatalog;
pub use mock_chooser::MockCodecChooser;
pub use mock_downloader::MockDownloader;
pub use mock_license::{MockLicenseService, MOCK_CONTENT_KEY};
pub use mock_remuxer::{MockRemuxer, RecordedRemux};
pub use mock_tagger::MockTagger;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::NaiveDate;

    use crate::media::{
        AudioQuality, Container, DrmInfo, MediaItem, MediaKind, Metadata, StreamDescriptor,
        TrackSource, VideoResolution,
    };

    /// A DRM-free audio stream. AAC tiers are mp4, Vorbis tiers ogg.
    pub fn audio_stream(id: &str, quality: AudioQuality, bitrate_kbps: u32) -> StreamDescriptor {
        let (codec, container) = if quality.is_mp4() {
            ("aac", Container::Mp4)
        } else {
            ("vorbis", Container::Ogg)
        };
        StreamDescriptor {
            id: id.to_string(),
            codec: codec.to_string(),
            container,
            bitrate_kbps,
            audio_quality: Some(quality),
            resolution: None,
            drm: None,
            audio: TrackSource::Single {
                url: format!("https://cdn.test/audio/{}", id),
            },
            video: None,
        }
    }

    /// A DRM-free video stream with segmented audio and video tracks.
    pub fn video_stream(
        id: &str,
        container: Container,
        resolution: VideoResolution,
        bitrate_kbps: u32,
    ) -> StreamDescriptor {
        let codec = match container {
            Container::Webm => "vp9",
            _ => "avc1",
        };
        let segments = |track: &str| TrackSource::Segments {
            urls: (0..3)
                .map(|i| format!("https://cdn.test/{}/{}/{}", track, id, i))
                .collect(),
        };
        StreamDescriptor {
            id: id.to_string(),
            codec: codec.to_string(),
            container,
            bitrate_kbps,
            audio_quality: None,
            resolution: Some(resolution),
            drm: None,
            audio: segments("audio"),
            video: Some(segments("video")),
        }
    }

    /// Marks `stream` as DRM-protected.
    pub fn drm_protected(mut stream: StreamDescriptor) -> StreamDescriptor {
        stream.drm = Some(DrmInfo {
            key_id: "0123456789abcdef0123456789abcdef".to_string(),
            pssh: "AAAAW3Bzc2g=".to_string(),
        });
        stream
    }

    /// A song leaf item.
    pub fn song(id: &str, title: &str) -> MediaItem {
        MediaItem::new(id, MediaKind::Song).with_label(title)
    }

    /// Metadata for a track on "Album" by "Artist", track `track` of 10.
    pub fn song_metadata(id: &str, title: &str, track: u32) -> Metadata {
        Metadata {
            media_id: id.to_string(),
            kind: Some(MediaKind::Song),
            title: Some(title.to_string()),
            artists: vec!["Artist".to_string()],
            album: Some("Album".to_string()),
            album_artists: vec!["Artist".to_string()],
            genre: Some("Pop".to_string()),
            disc: Some(1),
            disc_total: Some(1),
            track: Some(track),
            track_total: Some(10),
            date: NaiveDate::from_ymd_opt(2021, 5, 14),
            cover_url: Some(format!("https://img.test/{}.jpg", id)),
            ..Default::default()
        }
    }
}
