//! Trait definitions for the catalog collaborator.

use async_trait::async_trait;

use super::error::CatalogError;
use crate::media::{Lyrics, MediaItem, Metadata, StreamDescriptor};

/// Read-only access to the streaming catalog.
///
/// Resolution returns container items with their children already
/// expanded, so callers only need [`MediaItem::leaves`].
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Returns the name of this catalog implementation.
    fn name(&self) -> &str;

    /// Resolves a catalog URL into a typed item.
    async fn resolve(&self, url: &str) -> Result<MediaItem, CatalogError>;

    /// Lists the encodings available for a leaf item.
    async fn stream_candidates(&self, item: &MediaItem)
        -> Result<Vec<StreamDescriptor>, CatalogError>;

    /// Music-video version of a song, if the catalog has one.
    async fn video_version(&self, item: &MediaItem) -> Result<Option<MediaItem>, CatalogError>;

    /// Fetches descriptive metadata for a leaf item.
    async fn metadata(&self, item: &MediaItem) -> Result<Metadata, CatalogError>;

    /// Fetches lyrics; `None` when the item has none.
    async fn lyrics(&self, item: &MediaItem) -> Result<Option<Lyrics>, CatalogError>;

    /// Fetches cover art; `None` when the cover does not exist.
    async fn cover(&self, url: &str) -> Result<Option<Vec<u8>>, CatalogError>;
}
