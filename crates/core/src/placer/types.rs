//! Types for the placer module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One file to move into the output tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePlacement {
    pub item_id: String,
    /// File in the item's scratch directory.
    pub source: PathBuf,
    pub destination: PathBuf,
    pub overwrite: bool,
}

/// A file that reached its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedFile {
    pub item_id: String,
    pub destination: PathBuf,
    pub size_bytes: u64,
    /// sha256 of the placed file, when verification ran.
    pub checksum: Option<String>,
}
