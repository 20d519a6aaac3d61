//! Item pipeline.
//!
//! [`ItemPipeline`] composes quality negotiation, licensing, download,
//! remux, tagging and placement for one leaf item. Every run ends in a
//! terminal [`PipelineResult`]: written, skipped because the planned output
//! already exists, or failed with the stage and [`ErrorKind`] recorded.
//!
//! The output plan is always computed and checked against the overwrite
//! policy before any license request, download or tool invocation, and the
//! item's scratch directory is purged however the run ends.

mod config;
mod error;
mod item;
mod state;
mod types;
mod workspace;

pub use config::OutputConfig;
pub use error::{ErrorKind, PipelineError};
pub use item::{ItemPipeline, PipelineComponents, PipelineSettings};
pub use state::{ItemState, Stage};
pub use types::{ItemReport, PipelineResult, SkipReason};
pub use workspace::ItemWorkspace;
