//! Item state machine.
//!
//! ```text
//! Resolved -> QualitySelected -> Planned -> Licensed -> Downloaded -> Remuxed -> Tagged -> Placed
//!                                   |
//!                                   v
//!                                Skipped
//!
//! Any stage can transition to Failed(stage, kind); nothing leaves Failed.
//! ```
//!
//! `Licensed` is passed through without a license call for DRM-free streams.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::error::ErrorKind;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Resolved,
    QualitySelected,
    Planned,
    Licensed,
    Downloaded,
    Remuxed,
    Tagged,
    Placed,
}

impl Stage {
    /// The stage after this one, `None` after `Placed`.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Self::Resolved => Some(Self::QualitySelected),
            Self::QualitySelected => Some(Self::Planned),
            Self::Planned => Some(Self::Licensed),
            Self::Licensed => Some(Self::Downloaded),
            Self::Downloaded => Some(Self::Remuxed),
            Self::Remuxed => Some(Self::Tagged),
            Self::Tagged => Some(Self::Placed),
            Self::Placed => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolved => "Resolved",
            Self::QualitySelected => "QualitySelected",
            Self::Planned => "Planned",
            Self::Licensed => "Licensed",
            Self::Downloaded => "Downloaded",
            Self::Remuxed => "Remuxed",
            Self::Tagged => "Tagged",
            Self::Placed => "Placed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemState {
    /// Last stage reached.
    Active { stage: Stage },
    /// Terminal, non-error.
    Skipped,
    /// Terminal failure while attempting `stage`.
    Failed { stage: Stage, kind: ErrorKind },
}

impl ItemState {
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Active { stage } => *stage == Stage::Placed,
            Self::Skipped | Self::Failed { .. } => true,
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active { stage } => write!(f, "{}", stage),
            Self::Skipped => f.write_str("Skipped"),
            Self::Failed { stage, kind } => write!(f, "Failed({}, {})", stage, kind),
        }
    }
}

/// Records the stages one item passes through.
#[derive(Debug, Clone)]
pub(crate) struct StateTracker {
    item_id: String,
    trace: Vec<Stage>,
    state: ItemState,
}

impl StateTracker {
    pub(crate) fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            trace: vec![Stage::Resolved],
            state: ItemState::Active {
                stage: Stage::Resolved,
            },
        }
    }

    /// The stage currently being attempted.
    pub(crate) fn attempting(&self) -> Stage {
        match &self.state {
            ItemState::Active { stage } => stage.next().unwrap_or(Stage::Placed),
            ItemState::Failed { stage, .. } => *stage,
            ItemState::Skipped => Stage::Planned,
        }
    }

    /// Marks the attempted stage as reached. Returns the reached stage.
    pub(crate) fn advance(&mut self) -> Stage {
        let stage = self.attempting();
        if !self.state.is_terminal() {
            debug!(item_id = %self.item_id, stage = %stage, "Stage reached");
            self.trace.push(stage);
            self.state = ItemState::Active { stage };
        }
        stage
    }

    pub(crate) fn skip(&mut self) {
        if !self.state.is_terminal() {
            self.state = ItemState::Skipped;
        }
    }

    pub(crate) fn fail(&mut self, kind: ErrorKind) -> Stage {
        let stage = self.attempting();
        if !self.state.is_terminal() {
            self.state = ItemState::Failed { stage, kind };
        }
        stage
    }

    pub(crate) fn state(&self) -> &ItemState {
        &self.state
    }

    pub(crate) fn into_trace(self) -> Vec<Stage> {
        self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let mut stage = Stage::Resolved;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            seen.push(next);
            stage = next;
        }
        assert_eq!(seen.len(), 8);
        assert_eq!(stage, Stage::Placed);
    }

    #[test]
    fn test_tracker_runs_to_placed() {
        let mut tracker = StateTracker::new("t1");
        assert_eq!(tracker.attempting(), Stage::QualitySelected);
        while !tracker.state().is_terminal() {
            tracker.advance();
        }
        assert_eq!(
            tracker.state(),
            &ItemState::Active {
                stage: Stage::Placed
            }
        );
        assert_eq!(tracker.into_trace().len(), 8);
    }

    #[test]
    fn test_failure_records_attempted_stage() {
        let mut tracker = StateTracker::new("t1");
        tracker.advance();
        tracker.advance();
        let stage = tracker.fail(ErrorKind::DrmRequiredButDisabled);
        assert_eq!(stage, Stage::Licensed);
        assert_eq!(tracker.state().to_string(), "Failed(Licensed, DrmRequiredButDisabled)");

        // Failed is terminal.
        tracker.advance();
        assert!(matches!(tracker.state(), ItemState::Failed { .. }));
        assert_eq!(tracker.into_trace().len(), 3);
    }

    #[test]
    fn test_skip_is_terminal() {
        let mut tracker = StateTracker::new("t1");
        tracker.advance();
        tracker.advance();
        tracker.skip();
        tracker.fail(ErrorKind::DownloadFailed);
        assert_eq!(tracker.state(), &ItemState::Skipped);
    }
}
