//! Error types for catalog access.

use thiserror::Error;

use crate::retry::IsRetryable;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The URL is not a recognised catalog URL.
    #[error("Not a catalog URL: {url}")]
    InvalidUrl { url: String },

    /// No entry with this id.
    #[error("Catalog entry not found: {id}")]
    NotFound { id: String },

    /// The catalog could not be reached.
    #[error("Catalog unavailable: {reason}")]
    Unavailable { reason: String },

    /// The snapshot is malformed.
    #[error("Invalid catalog snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

impl IsRetryable for CatalogError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        Self::unavailable(e.to_string())
    }
}
