//! Batch orchestration.
//!
//! The [`BatchOrchestrator`] runs leaf items through the item pipeline
//! strictly one after another. A [`Pacer`] spaces item starts by the
//! configured wait interval to stay under service-side abuse detection.
//! A failed item is recorded and, unless configured otherwise, the batch
//! moves on; the [`BatchReport`] decides the process exit code.

mod config;
mod orchestrator;
mod pacer;
mod report;

pub use config::BatchConfig;
pub use orchestrator::BatchOrchestrator;
pub use pacer::Pacer;
pub use report::{BatchReport, UnresolvedUrl, EXIT_INTERRUPTED};
