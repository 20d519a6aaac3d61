//! Mock downloader for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::download::{DownloadError, DownloadJob, DownloadResult, Downloader};

/// Mock implementation of the Downloader trait.
///
/// Every fetch is recorded. Queued errors are returned first, one per
/// call; once the queue is empty the job's destination is written with
/// a few placeholder bytes.
///
/// # Example
///
/// ```rust,ignore
/// use spindle_core::testing::MockDownloader;
///
/// let downloader = MockDownloader::new();
/// downloader.push_error(DownloadError::Http { url, status: 503 }).await;
///
/// // First fetch fails, the second succeeds.
/// assert_eq!(downloader.recorded_jobs().await.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockDownloader {
    jobs: Arc<RwLock<Vec<DownloadJob>>>,
    errors: Arc<RwLock<VecDeque<DownloadError>>>,
}

impl MockDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an error for the next fetch.
    pub async fn push_error(&self, error: DownloadError) {
        self.errors.write().await.push_back(error);
    }

    /// All jobs fetched so far, including failed attempts.
    pub async fn recorded_jobs(&self) -> Vec<DownloadJob> {
        self.jobs.read().await.clone()
    }
}

#[async_trait]
impl Downloader for MockDownloader {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, job: &DownloadJob) -> Result<DownloadResult, DownloadError> {
        self.jobs.write().await.push(job.clone());

        if let Some(error) = self.errors.write().await.pop_front() {
            return Err(error);
        }

        let body = format!("mock-bytes:{}", job.item_id);
        tokio::fs::write(&job.destination, body.as_bytes()).await?;

        Ok(DownloadResult {
            path: job.destination.clone(),
            bytes: body.len() as u64,
            segments: job.source.urls().len(),
            duration_ms: 0,
        })
    }

    async fn validate(&self) -> Result<(), DownloadError> {
        Ok(())
    }
}
