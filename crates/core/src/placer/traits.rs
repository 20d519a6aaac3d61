//! Trait definitions for the placer module.

use async_trait::async_trait;
use std::path::Path;

use super::error::PlacerError;
use super::types::{FilePlacement, PlacedFile};

/// Moves finished files from scratch space into the output tree.
#[async_trait]
pub trait Placer: Send + Sync {
    /// Returns the name of this placer implementation.
    fn name(&self) -> &str;

    /// Moves one file to its destination.
    ///
    /// The destination never holds a partially written file.
    async fn place(&self, placement: &FilePlacement) -> Result<PlacedFile, PlacerError>;

    /// Writes `bytes` to `destination`, with the same guarantees as [`Placer::place`].
    async fn place_bytes(
        &self,
        item_id: &str,
        bytes: &[u8],
        destination: &Path,
        overwrite: bool,
    ) -> Result<PlacedFile, PlacerError>;
}
