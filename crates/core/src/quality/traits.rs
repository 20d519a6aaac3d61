//! Interactive selection seam.

use async_trait::async_trait;

use super::error::QualityError;
use crate::media::{MediaItem, StreamDescriptor};

/// Picks one stream among several eligible ones.
///
/// The pipeline blocks on this call; it is the only point where an item
/// waits for the operator.
#[async_trait]
pub trait CodecChooser: Send + Sync {
    /// Returns the index of the chosen candidate.
    async fn choose(
        &self,
        item: &MediaItem,
        candidates: &[StreamDescriptor],
    ) -> Result<usize, QualityError>;
}
