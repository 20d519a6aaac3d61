//! Mock remuxer for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::media::Container;
use crate::remux::{RemuxError, RemuxJob, RemuxResult, Remuxer};

/// A recorded remux job. The license key itself is never kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRemux {
    pub item_id: String,
    pub stream_id: String,
    pub decrypted: bool,
    pub output: PathBuf,
}

/// Mock implementation of the Remuxer trait.
///
/// Runs the same job checks as the real backends (key binding, input
/// presence), then writes the output by concatenating the inputs.
/// Failures can be primed per item id.
#[derive(Debug, Default)]
pub struct MockRemuxer {
    jobs: Arc<RwLock<Vec<RecordedRemux>>>,
    failures: Arc<RwLock<HashMap<String, RemuxError>>>,
}

impl MockRemuxer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next remux of `item_id` with `error`.
    pub async fn fail_item(&self, item_id: &str, error: RemuxError) {
        self.failures
            .write()
            .await
            .insert(item_id.to_string(), error);
    }

    pub async fn recorded_jobs(&self) -> Vec<RecordedRemux> {
        self.jobs.read().await.clone()
    }
}

#[async_trait]
impl Remuxer for MockRemuxer {
    fn name(&self) -> &str {
        "mock"
    }

    fn accepts_key_for(&self, _container: Container) -> bool {
        true
    }

    async fn remux(&self, job: RemuxJob) -> Result<RemuxResult, RemuxError> {
        self.check_job(&job)?;

        self.jobs.write().await.push(RecordedRemux {
            item_id: job.item_id.clone(),
            stream_id: job.stream.id.clone(),
            decrypted: job.key.is_some(),
            output: job.output.clone(),
        });

        if let Some(error) = self.failures.write().await.remove(&job.item_id) {
            return Err(error);
        }

        let mut body = Vec::new();
        for input in job.inputs() {
            let bytes = tokio::fs::read(input)
                .await
                .map_err(|e| RemuxError::remux_failed(e.to_string(), None))?;
            body.extend_from_slice(&bytes);
        }
        tokio::fs::write(&job.output, body)
            .await
            .map_err(|e| RemuxError::remux_failed(e.to_string(), None))?;

        Ok(RemuxResult {
            output: job.output.clone(),
            decrypted: job.key.is_some(),
            duration_ms: 0,
        })
    }

    async fn validate(&self) -> Result<(), RemuxError> {
        Ok(())
    }
}
