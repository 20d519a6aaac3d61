//! Trait definitions for taggers.

use async_trait::async_trait;

use super::error::TagError;
use super::types::TagJob;

/// Writes a tag set (and cover) onto a finished media file in place.
#[async_trait]
pub trait Tagger: Send + Sync {
    /// Returns the name of this tagger.
    fn name(&self) -> &str;

    /// Tags `job.media`, replacing it only once the tagged copy is complete.
    async fn tag(&self, job: &TagJob) -> Result<(), TagError>;

    /// Checks that the tagger's tools can run.
    async fn validate(&self) -> Result<(), TagError>;
}
