//! Catalog backed by a JSON snapshot file.
//!
//! The snapshot maps catalog ids to entries:
//!
//! ```json
//! {
//!   "entries": {
//!     "ALBUM...": { "kind": "album", "title": "Album", "children": ["TRACK..."] },
//!     "TRACK...": { "kind": "song", "streams": [...], "metadata": {...}, "lyrics": {...} }
//!   }
//! }
//! ```
//!
//! Container entries list their children by id, and a song may name its
//! music-video entry in `video_version`. Cover URLs are fetched
//! over HTTP, or read from disk relative to the snapshot when they are not
//! URLs.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::config::CatalogConfig;
use super::error::CatalogError;
use super::traits::Catalog;
use crate::media::{
    parse_media_url, Lyrics, MediaItem, MediaKind, Metadata, PlaylistContext, StreamDescriptor,
};

/// Containers nest at most artist → album → track.
const MAX_DEPTH: usize = 4;

/// One catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub kind: MediaKind,
    #[serde(default)]
    pub title: Option<String>,
    /// Playlist owner.
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub streams: Vec<StreamDescriptor>,
    /// Id of the music-video entry for this song.
    #[serde(default)]
    pub video_version: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub lyrics: Option<Lyrics>,
}

impl SnapshotEntry {
    fn title(&self) -> Option<&str> {
        self.title.as_deref().or(self.metadata.title.as_deref())
    }
}

/// Deserialised snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub entries: HashMap<String, SnapshotEntry>,
}

/// [`Catalog`] served from a [`CatalogSnapshot`].
pub struct JsonCatalog {
    snapshot: CatalogSnapshot,
    base_dir: PathBuf,
    client: Client,
}

impl JsonCatalog {
    /// Loads the snapshot named by `config`.
    pub async fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let raw = tokio::fs::read_to_string(&config.snapshot)
            .await
            .map_err(|e| CatalogError::InvalidSnapshot {
                reason: format!("{}: {}", config.snapshot.display(), e),
            })?;
        let base_dir = config
            .snapshot
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::from_json(&raw, base_dir, config.timeout_secs)
    }

    /// Parses a snapshot from JSON text.
    pub fn from_json(
        raw: &str,
        base_dir: impl Into<PathBuf>,
        timeout_secs: u64,
    ) -> Result<Self, CatalogError> {
        let snapshot: CatalogSnapshot =
            serde_json::from_str(raw).map_err(|e| CatalogError::InvalidSnapshot {
                reason: e.to_string(),
            })?;
        Self::new(snapshot, base_dir, timeout_secs)
    }

    pub fn new(
        snapshot: CatalogSnapshot,
        base_dir: impl Into<PathBuf>,
        timeout_secs: u64,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            snapshot,
            base_dir: base_dir.into(),
            client,
        })
    }

    fn entry(&self, id: &str) -> Result<&SnapshotEntry, CatalogError> {
        self.snapshot
            .entries
            .get(id)
            .ok_or_else(|| CatalogError::not_found(id))
    }

    fn build(&self, id: &str, depth: usize) -> Result<MediaItem, CatalogError> {
        if depth > MAX_DEPTH {
            return Err(CatalogError::InvalidSnapshot {
                reason: format!("entry {} nests too deeply", id),
            });
        }

        let entry = self.entry(id)?;
        let mut item = MediaItem::new(id, entry.kind);
        if let Some(title) = entry.title() {
            item = item.with_label(title);
        }
        if entry.kind.is_leaf() {
            return Ok(item);
        }

        let mut children = entry
            .children
            .iter()
            .map(|child| self.build(child, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;

        if entry.kind == MediaKind::Playlist {
            let total = children.len() as u32;
            for (index, child) in children.iter_mut().enumerate() {
                child.playlist = Some(PlaylistContext {
                    id: id.to_string(),
                    title: entry.title().unwrap_or(id).to_string(),
                    artist: entry.owner.clone().unwrap_or_default(),
                    track: index as u32 + 1,
                    track_total: total,
                });
            }
        }

        Ok(item.with_children(children))
    }

    async fn fetch_remote_cover(&self, url: &str) -> Result<Option<Vec<u8>>, CatalogError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(url = %url, "Cover not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CatalogError::unavailable(format!(
                "cover request returned {}",
                status
            )));
        }
        Ok(Some(response.bytes().await?.to_vec()))
    }
}

#[async_trait]
impl Catalog for JsonCatalog {
    fn name(&self) -> &str {
        "json"
    }

    async fn resolve(&self, url: &str) -> Result<MediaItem, CatalogError> {
        let parsed = parse_media_url(url).ok_or_else(|| CatalogError::InvalidUrl {
            url: url.to_string(),
        })?;
        let item = self.build(&parsed.id, 0)?;
        debug!(url = %url, kind = %item.kind, id = %item.id, "Resolved catalog URL");
        Ok(item)
    }

    async fn stream_candidates(
        &self,
        item: &MediaItem,
    ) -> Result<Vec<StreamDescriptor>, CatalogError> {
        Ok(self.entry(&item.id)?.streams.clone())
    }

    async fn video_version(&self, item: &MediaItem) -> Result<Option<MediaItem>, CatalogError> {
        let Some(id) = self.entry(&item.id)?.video_version.as_deref() else {
            return Ok(None);
        };
        let video = self.build(id, 0)?;
        if !video.kind.is_video() || !video.kind.is_leaf() {
            return Err(CatalogError::InvalidSnapshot {
                reason: format!("video_version of {} is a {}", item.id, video.kind),
            });
        }
        Ok(Some(video))
    }

    async fn metadata(&self, item: &MediaItem) -> Result<Metadata, CatalogError> {
        let mut metadata = self.entry(&item.id)?.metadata.clone();
        metadata.media_id = item.id.clone();
        metadata.kind = Some(item.kind);
        Ok(metadata)
    }

    async fn lyrics(&self, item: &MediaItem) -> Result<Option<Lyrics>, CatalogError> {
        Ok(self
            .entry(&item.id)?
            .lyrics
            .clone()
            .filter(|lyrics| !lyrics.is_empty()))
    }

    async fn cover(&self, url: &str) -> Result<Option<Vec<u8>>, CatalogError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return self.fetch_remote_cover(url).await;
        }

        let path = self.base_dir.join(url);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ALBUM: &str = "AAAAAAAAAAAAAAAAAAAAAA";
    const PLAYLIST: &str = "PPPPPPPPPPPPPPPPPPPPPP";
    const TRACK_1: &str = "T1T1T1T1T1T1T1T1T1T1T1";
    const TRACK_2: &str = "T2T2T2T2T2T2T2T2T2T2T2";
    const VIDEO_1: &str = "V1V1V1V1V1V1V1V1V1V1V1";

    fn catalog() -> JsonCatalog {
        let raw = serde_json::json!({
            "entries": {
                ALBUM: { "kind": "album", "title": "Album", "children": [TRACK_1, TRACK_2] },
                PLAYLIST: {
                    "kind": "playlist",
                    "title": "Mix",
                    "owner": "Someone",
                    "children": [TRACK_2, TRACK_1]
                },
                TRACK_1: {
                    "kind": "song",
                    "video_version": VIDEO_1,
                    "metadata": { "title": "One", "track": 1 },
                    "lyrics": { "synced": [{ "start_ms": 1000, "text": "la" }] },
                    "streams": [{
                        "id": "s1",
                        "codec": "aac",
                        "container": "mp4",
                        "bitrate_kbps": 128,
                        "audio_quality": "aac-medium",
                        "audio": { "type": "single", "url": "https://cdn.test/s1" }
                    }]
                },
                TRACK_2: {
                    "kind": "song",
                    "video_version": ALBUM,
                    "metadata": { "title": "Two", "track": 2 }
                },
                VIDEO_1: { "kind": "music-video", "title": "One (Video)" }
            }
        });
        JsonCatalog::from_json(&raw.to_string(), ".", 5).unwrap()
    }

    fn url(kind: &str, id: &str) -> String {
        format!("https://open.example.com/{}/{}", kind, id)
    }

    #[tokio::test]
    async fn test_resolve_album_expands_children() {
        let item = catalog().resolve(&url("album", ALBUM)).await.unwrap();
        assert_eq!(item.kind, MediaKind::Album);
        assert_eq!(item.label.as_deref(), Some("Album"));

        let leaves = item.leaves();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].id, TRACK_1);
        assert_eq!(leaves[0].label.as_deref(), Some("One"));
        assert!(leaves[0].playlist.is_none());
    }

    #[tokio::test]
    async fn test_resolve_playlist_sets_positions() {
        let item = catalog().resolve(&url("playlist", PLAYLIST)).await.unwrap();
        let leaves = item.leaves();
        let context = leaves[1].playlist.as_ref().unwrap();
        assert_eq!(leaves[1].id, TRACK_1);
        assert_eq!(context.track, 2);
        assert_eq!(context.track_total, 2);
        assert_eq!(context.title, "Mix");
        assert_eq!(context.artist, "Someone");
    }

    #[tokio::test]
    async fn test_resolve_rejects_foreign_url() {
        let err = catalog()
            .resolve("https://example.com/watch?v=1")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_resolve_unknown_id() {
        let err = catalog()
            .resolve(&url("track", "ZZZZZZZZZZZZZZZZZZZZZZ"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_metadata_and_lyrics() {
        let catalog = catalog();
        let item = MediaItem::new(TRACK_1, MediaKind::Song);

        let metadata = catalog.metadata(&item).await.unwrap();
        assert_eq!(metadata.media_id, TRACK_1);
        assert_eq!(metadata.kind, Some(MediaKind::Song));
        assert_eq!(metadata.title.as_deref(), Some("One"));

        let lyrics = catalog.lyrics(&item).await.unwrap().unwrap();
        assert!(lyrics.has_synced());

        let other = MediaItem::new(TRACK_2, MediaKind::Song);
        assert!(catalog.lyrics(&other).await.unwrap().is_none());
        assert!(catalog.stream_candidates(&other).await.unwrap().is_empty());
        assert_eq!(catalog.stream_candidates(&item).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_video_version() {
        let catalog = catalog();

        let song = MediaItem::new(TRACK_1, MediaKind::Song);
        let video = catalog.video_version(&song).await.unwrap().unwrap();
        assert_eq!(video.id, VIDEO_1);
        assert_eq!(video.kind, MediaKind::MusicVideo);
        assert_eq!(video.label.as_deref(), Some("One (Video)"));

        let none = MediaItem::new(VIDEO_1, MediaKind::MusicVideo);
        assert!(catalog.video_version(&none).await.unwrap().is_none());

        let broken = MediaItem::new(TRACK_2, MediaKind::Song);
        let err = catalog.video_version(&broken).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSnapshot { .. }));
    }

    #[tokio::test]
    async fn test_remote_cover() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cover.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let catalog = catalog();
        let bytes = catalog
            .cover(&format!("{}/cover.jpg", server.uri()))
            .await
            .unwrap();
        assert_eq!(bytes, Some(b"jpeg".to_vec()));

        let missing = catalog
            .cover(&format!("{}/missing.jpg", server.uri()))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_local_cover_relative_to_snapshot() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("art.jpg"), b"local").unwrap();

        let catalog = JsonCatalog::new(CatalogSnapshot::default(), temp.path(), 5).unwrap();
        assert_eq!(catalog.cover("art.jpg").await.unwrap(), Some(b"local".to_vec()));
        assert!(catalog.cover("none.jpg").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_missing_snapshot() {
        let config = CatalogConfig {
            snapshot: PathBuf::from("/nonexistent/catalog.json"),
            ..Default::default()
        };
        let result = JsonCatalog::load(&config).await;
        assert!(matches!(result, Err(CatalogError::InvalidSnapshot { .. })));
    }
}
