//! Metadata resolution against the catalog.

use std::sync::Arc;
use tracing::{debug, warn};

use super::config::TagConfig;
use super::tags::TagSet;
use crate::catalog::{Catalog, CatalogError};
use crate::media::{MediaItem, Metadata};

/// Fetches the metadata record, lyrics and cover for a leaf item.
pub struct MetadataResolver {
    catalog: Arc<dyn Catalog>,
    config: TagConfig,
}

impl MetadataResolver {
    pub fn new(catalog: Arc<dyn Catalog>, config: TagConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &TagConfig {
        &self.config
    }

    /// Builds the full metadata record for `item`.
    ///
    /// Lyrics are only requested for kinds that carry them; a missing or
    /// failed lyrics lookup leaves the record without lyrics.
    pub async fn resolve(&self, item: &MediaItem) -> Result<Metadata, CatalogError> {
        let mut metadata = self.catalog.metadata(item).await?;
        metadata.media_id = item.id.clone();
        metadata.kind = Some(item.kind);

        if item.kind.has_lyrics() {
            match self.catalog.lyrics(item).await {
                Ok(Some(lyrics)) => metadata.lyrics = lyrics,
                Ok(None) => debug!(item_id = %item.id, "No lyrics available"),
                Err(e) => warn!(item_id = %item.id, error = %e, "Lyrics lookup failed"),
            }
        }

        if let Some(playlist) = &item.playlist {
            metadata.apply_playlist(playlist);
        }

        Ok(metadata)
    }

    /// Downloads the cover image in the configured size, if the metadata
    /// names one.
    pub async fn cover(&self, metadata: &Metadata) -> Option<Vec<u8>> {
        let url = metadata.cover_url_for(self.config.cover_size)?;
        match self.catalog.cover(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(item_id = %metadata.media_id, error = %e, "Cover fetch failed");
                None
            }
        }
    }

    /// Tag set for `metadata` under this resolver's exclusions.
    pub fn tags(&self, metadata: &Metadata, date_format: &str) -> TagSet {
        TagSet::build(metadata, &self.config, date_format)
    }
}
