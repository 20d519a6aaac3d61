//! Error types for quality negotiation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QualityError {
    /// No candidate survived filtering.
    #[error("No eligible stream for {item_id}: {reason}")]
    NoEligibleStream { item_id: String, reason: String },

    /// The chooser returned an index outside the candidate list.
    #[error("Invalid choice {index} (expected 0..{count})")]
    InvalidChoice { index: usize, count: usize },

    /// The operator aborted the choice.
    #[error("Stream selection cancelled")]
    SelectionCancelled,
}

impl QualityError {
    pub fn no_eligible(item_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NoEligibleStream {
            item_id: item_id.into(),
            reason: reason.into(),
        }
    }
}
