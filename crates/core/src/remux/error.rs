//! Error types for remux backends.

use std::path::PathBuf;
use thiserror::Error;

use crate::media::Container;
use crate::process::ToolError;

#[derive(Debug, Error)]
pub enum RemuxError {
    /// A key was supplied but the backend cannot decrypt this container.
    #[error("Remux mode '{mode}' cannot decrypt {container} streams")]
    IncompatibleRemuxMode { mode: String, container: Container },

    /// The key was issued for another stream.
    #[error("License key for stream {key_stream} used with stream {stream}")]
    KeyMismatch { key_stream: String, stream: String },

    /// A tool failed or produced no usable output.
    #[error("Remux failed: {reason}")]
    RemuxFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// An input file is missing.
    #[error("Remux input not found: {path}")]
    InputNotFound { path: PathBuf },

    /// A required tool is not installed.
    #[error("Remux tool unavailable: {0}")]
    ToolUnavailable(ToolError),
}

impl RemuxError {
    pub fn remux_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::RemuxFailed {
            reason: reason.into(),
            stderr,
        }
    }
}

impl From<ToolError> for RemuxError {
    fn from(e: ToolError) -> Self {
        let stderr = e.stderr().map(str::to_string);
        Self::remux_failed(e.to_string(), stderr)
    }
}
