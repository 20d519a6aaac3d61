//! Mock catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{Catalog, CatalogError};
use crate::media::{Lyrics, MediaItem, Metadata, StreamDescriptor};

/// In-memory implementation of the Catalog trait.
///
/// Items are registered by URL, streams and metadata by item id. Items
/// without registered metadata get a record carrying only their id and
/// kind, so tests only spell out the fields they assert on.
///
/// # Example
///
/// ```rust,ignore
/// use spindle_core::testing::MockCatalog;
///
/// let catalog = MockCatalog::new();
/// catalog.add_item("https://open.test/track/abc", item).await;
/// catalog.set_streams("abc", vec![stream]).await;
///
/// let resolved = catalog.resolve("https://open.test/track/abc").await?;
/// ```
#[derive(Debug, Default)]
pub struct MockCatalog {
    items: Arc<RwLock<HashMap<String, MediaItem>>>,
    streams: Arc<RwLock<HashMap<String, Vec<StreamDescriptor>>>>,
    metadata: Arc<RwLock<HashMap<String, Metadata>>>,
    lyrics: Arc<RwLock<HashMap<String, Lyrics>>>,
    covers: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    video_versions: Arc<RwLock<HashMap<String, MediaItem>>>,
    fail_lyrics: Arc<RwLock<bool>>,
    lyrics_calls: Arc<RwLock<usize>>,
    stream_calls: Arc<RwLock<usize>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the item `url` resolves to.
    pub async fn add_item(&self, url: &str, item: MediaItem) {
        self.items.write().await.insert(url.to_string(), item);
    }

    pub async fn set_streams(&self, item_id: &str, streams: Vec<StreamDescriptor>) {
        self.streams
            .write()
            .await
            .insert(item_id.to_string(), streams);
    }

    pub async fn set_metadata(&self, item_id: &str, metadata: Metadata) {
        self.metadata
            .write()
            .await
            .insert(item_id.to_string(), metadata);
    }

    pub async fn set_lyrics(&self, item_id: &str, lyrics: Lyrics) {
        self.lyrics.write().await.insert(item_id.to_string(), lyrics);
    }

    pub async fn set_cover(&self, url: &str, bytes: Vec<u8>) {
        self.covers.write().await.insert(url.to_string(), bytes);
    }

    /// Register `video` as the music-video version of `item_id`.
    pub async fn set_video_version(&self, item_id: &str, video: MediaItem) {
        self.video_versions
            .write()
            .await
            .insert(item_id.to_string(), video);
    }

    /// Make every lyrics lookup fail with `Unavailable`.
    pub async fn fail_lyrics(&self, fail: bool) {
        *self.fail_lyrics.write().await = fail;
    }

    /// Number of lyrics lookups made so far.
    pub async fn lyrics_calls(&self) -> usize {
        *self.lyrics_calls.read().await
    }

    /// Number of stream candidate lookups made so far.
    pub async fn stream_calls(&self) -> usize {
        *self.stream_calls.read().await
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    async fn resolve(&self, url: &str) -> Result<MediaItem, CatalogError> {
        self.items
            .read()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| CatalogError::InvalidUrl {
                url: url.to_string(),
            })
    }

    async fn stream_candidates(
        &self,
        item: &MediaItem,
    ) -> Result<Vec<StreamDescriptor>, CatalogError> {
        *self.stream_calls.write().await += 1;
        Ok(self
            .streams
            .read()
            .await
            .get(&item.id)
            .cloned()
            .unwrap_or_default())
    }

    async fn video_version(&self, item: &MediaItem) -> Result<Option<MediaItem>, CatalogError> {
        Ok(self.video_versions.read().await.get(&item.id).cloned())
    }

    async fn metadata(&self, item: &MediaItem) -> Result<Metadata, CatalogError> {
        if let Some(metadata) = self.metadata.read().await.get(&item.id) {
            return Ok(metadata.clone());
        }
        Ok(Metadata {
            media_id: item.id.clone(),
            kind: Some(item.kind),
            title: item.label.clone(),
            ..Default::default()
        })
    }

    async fn lyrics(&self, item: &MediaItem) -> Result<Option<Lyrics>, CatalogError> {
        *self.lyrics_calls.write().await += 1;
        if *self.fail_lyrics.read().await {
            return Err(CatalogError::unavailable("lyrics service down"));
        }
        Ok(self.lyrics.read().await.get(&item.id).cloned())
    }

    async fn cover(&self, url: &str) -> Result<Option<Vec<u8>>, CatalogError> {
        Ok(self.covers.read().await.get(url).cloned())
    }
}
