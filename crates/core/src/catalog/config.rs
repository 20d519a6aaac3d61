//! Configuration for the catalog collaborator.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the catalog snapshot lives and how covers are fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON snapshot file.
    #[serde(default = "default_snapshot")]
    pub snapshot: PathBuf,

    /// Timeout for cover requests in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_snapshot() -> PathBuf {
    PathBuf::from("catalog.json")
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
