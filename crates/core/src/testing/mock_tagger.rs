//! Mock tagger for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::metadata::{TagError, TagJob, Tagger};

/// Records tag jobs without touching the media file.
#[derive(Debug, Default)]
pub struct MockTagger {
    jobs: Arc<RwLock<Vec<TagJob>>>,
    next_error: Arc<RwLock<Option<TagError>>>,
}

impl MockTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next tag call with `error`.
    pub async fn set_next_error(&self, error: TagError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn recorded_jobs(&self) -> Vec<TagJob> {
        self.jobs.read().await.clone()
    }
}

#[async_trait]
impl Tagger for MockTagger {
    fn name(&self) -> &str {
        "mock"
    }

    async fn tag(&self, job: &TagJob) -> Result<(), TagError> {
        self.jobs.write().await.push(job.clone());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        if !job.media.exists() {
            return Err(TagError::MediaNotFound {
                path: job.media.clone(),
            });
        }
        Ok(())
    }

    async fn validate(&self) -> Result<(), TagError> {
        Ok(())
    }
}
