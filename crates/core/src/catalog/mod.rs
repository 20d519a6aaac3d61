//! Catalog collaborator.
//!
//! The pipeline only talks to the streaming catalog through the [`Catalog`]
//! trait: URL resolution, stream candidates, metadata, lyrics and covers.
//! The shipped implementation serves a JSON snapshot ([`JsonCatalog`]).

mod config;
mod error;
mod snapshot;
mod traits;

pub use config::CatalogConfig;
pub use error::CatalogError;
pub use snapshot::{CatalogSnapshot, JsonCatalog, SnapshotEntry};
pub use traits::Catalog;

use std::sync::Arc;

/// Loads the catalog described by `config`.
pub async fn create_catalog(config: &CatalogConfig) -> Result<Arc<dyn Catalog>, CatalogError> {
    let catalog = JsonCatalog::load(config).await?;
    Ok(Arc::new(catalog))
}
