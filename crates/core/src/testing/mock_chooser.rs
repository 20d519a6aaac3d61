//! Scripted codec chooser for ask-mode tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::media::{MediaItem, StreamDescriptor};
use crate::quality::{CodecChooser, QualityError};

/// Answers every prompt with a preset index (0 by default), or cancels.
#[derive(Debug, Default)]
pub struct MockCodecChooser {
    choice: Arc<RwLock<usize>>,
    cancel: Arc<RwLock<bool>>,
    calls: Arc<RwLock<usize>>,
}

impl MockCodecChooser {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_choice(&self, index: usize) {
        *self.choice.write().await = index;
    }

    /// Answer every prompt with `SelectionCancelled`.
    pub async fn set_cancel(&self, cancel: bool) {
        *self.cancel.write().await = cancel;
    }

    pub async fn call_count(&self) -> usize {
        *self.calls.read().await
    }
}

#[async_trait]
impl CodecChooser for MockCodecChooser {
    async fn choose(
        &self,
        _item: &MediaItem,
        _candidates: &[StreamDescriptor],
    ) -> Result<usize, QualityError> {
        *self.calls.write().await += 1;
        if *self.cancel.read().await {
            return Err(QualityError::SelectionCancelled);
        }
        Ok(*self.choice.read().await)
    }
}
