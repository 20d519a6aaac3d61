//! Error types for download backends.

use thiserror::Error;

use crate::process::ToolError;
use crate::retry::IsRetryable;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// The server answered with an error status.
    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },

    /// The connection failed or broke mid-transfer.
    #[error("Network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    /// Fewer bytes arrived than announced.
    #[error("Truncated transfer from {url}: expected {expected} bytes, got {received}")]
    Truncated {
        url: String,
        expected: u64,
        received: u64,
    },

    /// The external fetch tool failed.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// The track has nothing to fetch.
    #[error("Invalid source: {reason}")]
    InvalidSource { reason: String },

    /// Writing into the scratch directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IsRetryable for DownloadError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::Network { .. } | Self::Truncated { .. } => true,
            Self::Tool(ToolError::Failed { .. } | ToolError::Timeout { .. }) => true,
            Self::Tool(_) | Self::InvalidSource { .. } | Self::Io(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_retryable_classification() {
        let http = |status| DownloadError::Http {
            url: "u".to_string(),
            status,
        };
        assert!(http(503).is_retryable());
        assert!(http(429).is_retryable());
        assert!(!http(404).is_retryable());
        assert!(DownloadError::Truncated {
            url: "u".to_string(),
            expected: 10,
            received: 5
        }
        .is_retryable());
        assert!(!DownloadError::Tool(ToolError::NotFound {
            tool: "curl".to_string(),
            path: PathBuf::from("curl"),
        })
        .is_retryable());
    }
}
