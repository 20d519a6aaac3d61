//! Placer module for moving finished files into the output tree.
//!
//! Files are renamed into place when scratch and output share a
//! filesystem and copied through a `.part` sibling otherwise, so a
//! destination path never holds a half-written file. Parent directories
//! are created on demand and sha256 verification is optional.

mod config;
mod error;
mod fs_placer;
mod traits;
mod types;

pub use config::PlacerConfig;
pub use error::PlacerError;
pub use fs_placer::FsPlacer;
pub use traits::Placer;
pub use types::{FilePlacement, PlacedFile};
