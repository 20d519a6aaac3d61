//! Trait definitions for remux backends.

use async_trait::async_trait;

use super::error::RemuxError;
use super::types::{RemuxJob, RemuxResult};
use crate::media::Container;

/// Produces one finished, untagged media file from downloaded tracks.
#[async_trait]
pub trait Remuxer: Send + Sync {
    /// Returns the name of this backend.
    fn name(&self) -> &str;

    /// Whether this backend can decrypt tracks in `container`.
    fn accepts_key_for(&self, container: Container) -> bool;

    /// Decrypts (if keyed) and muxes the job's inputs into its output.
    async fn remux(&self, job: RemuxJob) -> Result<RemuxResult, RemuxError>;

    /// Checks that the backend's tools can run.
    async fn validate(&self) -> Result<(), RemuxError>;

    /// Rejects jobs this backend cannot handle before any tool runs.
    fn check_job(&self, job: &RemuxJob) -> Result<(), RemuxError> {
        if let Some(key) = &job.key {
            if !key.is_bound_to(&job.stream) {
                return Err(RemuxError::KeyMismatch {
                    key_stream: key.stream_id().to_string(),
                    stream: job.stream.id.clone(),
                });
            }
            if !self.accepts_key_for(job.stream.container) {
                return Err(RemuxError::IncompatibleRemuxMode {
                    mode: self.name().to_string(),
                    container: job.stream.container,
                });
            }
        }
        for input in job.inputs() {
            if !input.exists() {
                return Err(RemuxError::InputNotFound {
                    path: input.to_path_buf(),
                });
            }
        }
        Ok(())
    }
}
