//! Types for item pipeline results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::ErrorKind;
use super::state::{ItemState, Stage};

/// Why an item was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkipReason {
    /// The media file exists and overwrite is disabled.
    OutputExists { path: PathBuf },
    /// Only the synced lyrics file was requested.
    SyncedLyricsOnly,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutputExists { path } => write!(f, "output exists: {}", path.display()),
            Self::SyncedLyricsOnly => f.write_str("synced lyrics only"),
        }
    }
}

/// Per-item outcome. Never mutated after emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PipelineResult {
    Written {
        path: PathBuf,
        /// Quality downgrade notes from negotiation.
        downgrades: Vec<String>,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        stage: Stage,
        kind: ErrorKind,
        message: String,
        /// Captured tool stderr.
        diagnostics: Option<String>,
    },
}

impl PipelineResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Final path of a written item.
    pub fn written_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Written { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<(Stage, ErrorKind)> {
        match self {
            Self::Failed { stage, kind, .. } => Some((*stage, *kind)),
            _ => None,
        }
    }
}

/// Everything reported about one item run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReport {
    pub item_id: String,
    pub label: String,
    pub result: PipelineResult,
    /// Stages reached, in order.
    pub trace: Vec<Stage>,
    pub duration_ms: u64,
}

impl ItemReport {
    /// Terminal state of the item.
    pub fn state(&self) -> ItemState {
        match &self.result {
            PipelineResult::Written { .. } => ItemState::Active {
                stage: Stage::Placed,
            },
            PipelineResult::Skipped { .. } => ItemState::Skipped,
            PipelineResult::Failed { stage, kind, .. } => ItemState::Failed {
                stage: *stage,
                kind: *kind,
            },
        }
    }
}
