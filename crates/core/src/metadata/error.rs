//! Error types for tagging.

use std::path::PathBuf;
use thiserror::Error;

use crate::process::ToolError;

#[derive(Debug, Error)]
pub enum TagError {
    /// Writing tags onto the media file failed.
    #[error("Tagging failed: {reason}")]
    TaggingFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// The media file to tag does not exist.
    #[error("Media file not found: {path}")]
    MediaNotFound { path: PathBuf },

    /// The tagging tool is not installed.
    #[error("Tagging tool unavailable: {0}")]
    ToolUnavailable(ToolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TagError {
    pub fn tagging_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::TaggingFailed {
            reason: reason.into(),
            stderr,
        }
    }
}

impl From<ToolError> for TagError {
    fn from(e: ToolError) -> Self {
        let stderr = e.stderr().map(str::to_string);
        Self::tagging_failed(e.to_string(), stderr)
    }
}
