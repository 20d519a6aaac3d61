//! Batch results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::pipeline::{ItemReport, PipelineResult};

/// Exit code for an operator-interrupted run.
pub const EXIT_INTERRUPTED: i32 = 130;

/// A URL that never produced items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedUrl {
    pub url: String,
    pub error: String,
}

/// Aggregated outcome of a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Item reports in processing order.
    pub items: Vec<ItemReport>,
    pub unresolved: Vec<UnresolvedUrl>,
    pub interrupted: bool,
}

impl BatchReport {
    pub fn record_unresolved(&mut self, url: impl Into<String>, error: impl ToString) {
        self.unresolved.push(UnresolvedUrl {
            url: url.into(),
            error: error.to_string(),
        });
    }

    /// Appends the results of a later batch.
    pub fn merge(&mut self, other: BatchReport) {
        self.items.extend(other.items);
        self.unresolved.extend(other.unresolved);
        self.interrupted |= other.interrupted;
    }

    pub fn placed(&self) -> usize {
        self.count(|r| matches!(r, PipelineResult::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|r| matches!(r, PipelineResult::Skipped { .. }))
    }

    /// Failed items plus unresolved URLs.
    pub fn failed(&self) -> usize {
        self.count(PipelineResult::is_failed) + self.unresolved.len()
    }

    fn count(&self, predicate: impl Fn(&PipelineResult) -> bool) -> usize {
        self.items.iter().filter(|i| predicate(&i.result)).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|i| i.result.is_failed())
    }

    /// Final paths of written items, in batch order.
    pub fn written_paths(&self) -> Vec<PathBuf> {
        self.items
            .iter()
            .filter_map(|i| i.result.written_path().cloned())
            .collect()
    }

    /// 0 when every item was placed or skipped, 130 when interrupted, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.interrupted {
            EXIT_INTERRUPTED
        } else if self.failed() > 0 {
            1
        } else {
            0
        }
    }

    /// Emits the run summary.
    pub fn log_summary(&self) {
        for item in self.failures() {
            if let PipelineResult::Failed {
                stage,
                kind,
                message,
                diagnostics,
            } = &item.result
            {
                error!(
                    item_id = %item.item_id,
                    label = %item.label,
                    stage = %stage,
                    kind = %kind,
                    diagnostics = diagnostics.as_deref().unwrap_or(""),
                    "{}",
                    message
                );
            }
        }
        for unresolved in &self.unresolved {
            error!(url = %unresolved.url, "Could not resolve: {}", unresolved.error);
        }
        if self.interrupted {
            warn!("Batch interrupted");
        }
        info!(
            placed = self.placed(),
            skipped = self.skipped(),
            failed = self.failed(),
            "Batch finished"
        );
    }
}
