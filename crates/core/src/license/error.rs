//! Error types for license acquisition.

use std::path::PathBuf;
use thiserror::Error;

use crate::retry::IsRetryable;

#[derive(Debug, Error)]
pub enum LicenseError {
    /// The stream is protected but licensing is disabled.
    #[error("Stream {stream_id} requires DRM but DRM is disabled")]
    DrmRequiredButDisabled { stream_id: String },

    /// The license service rejected the request.
    #[error("License denied: {reason}")]
    Denied { reason: String },

    /// The license service could not be reached or is overloaded.
    #[error("License service unavailable: {reason}")]
    Unavailable { reason: String },

    /// The license response could not be used.
    #[error("Invalid license response: {reason}")]
    InvalidResponse { reason: String },

    /// The device credential file does not exist.
    #[error("Device credential not found: {path}")]
    CredentialNotFound { path: PathBuf },

    /// The device credential could not be read or is empty.
    #[error("Invalid device credential: {reason}")]
    InvalidCredential { reason: String },
}

impl LicenseError {
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied {
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }
}

impl IsRetryable for LicenseError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
