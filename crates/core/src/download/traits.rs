//! Trait definitions for download backends.

use async_trait::async_trait;

use super::error::DownloadError;
use super::types::{DownloadJob, DownloadResult};

/// Fetches one track into a local file.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Returns the name of this backend.
    fn name(&self) -> &str;

    /// Fetches every URL of the job's source into its destination.
    ///
    /// A short transfer is an error. The destination is rewritten from
    /// scratch on each call.
    async fn fetch(&self, job: &DownloadJob) -> Result<DownloadResult, DownloadError>;

    /// Checks that the backend can run.
    async fn validate(&self) -> Result<(), DownloadError>;
}
