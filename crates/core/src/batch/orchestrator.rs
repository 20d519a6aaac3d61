//! Sequential batch execution.

use std::path::Path;
use tokio::sync::broadcast;
use tracing::{info, warn};

use super::config::BatchConfig;
use super::pacer::Pacer;
use super::report::BatchReport;
use crate::media::MediaItem;
use crate::pipeline::{ErrorKind, ItemPipeline};
use crate::playlist::write_aggregate_playlist;

/// Runs items one at a time with pacing and failure isolation.
pub struct BatchOrchestrator {
    pipeline: ItemPipeline,
    config: BatchConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl BatchOrchestrator {
    pub fn new(pipeline: ItemPipeline, config: BatchConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            pipeline,
            config,
            shutdown_tx,
        }
    }

    /// Sender that interrupts the running batch.
    ///
    /// The item in flight is aborted with its scratch space purged, and no
    /// further items start.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    pub fn pipeline(&self) -> &ItemPipeline {
        &self.pipeline
    }

    /// Processes `items` in order.
    pub async fn run(&self, items: Vec<MediaItem>) -> BatchReport {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut pacer = Pacer::new(self.config.wait_interval());
        let mut report = BatchReport::default();
        let total = items.len();

        info!(
            total,
            wait_interval_ms = pacer.interval().as_millis() as u64,
            "Starting batch"
        );

        for (index, item) in items.into_iter().enumerate() {
            tokio::select! {
                _ = pacer.wait() => {}
                _ = shutdown_rx.recv() => {
                    info!("Batch received shutdown signal");
                    report.interrupted = true;
                    break;
                }
            }

            info!(
                position = index + 1,
                total,
                item_id = %item.id,
                "Starting item"
            );

            let rx = &mut shutdown_rx;
            let item_report = self
                .pipeline
                .run_until(item, async move {
                    let _ = rx.recv().await;
                })
                .await;

            let failure = item_report.result.failure();
            report.items.push(item_report);

            match failure {
                Some((_, ErrorKind::Interrupted)) => {
                    report.interrupted = true;
                    break;
                }
                Some(_) if !self.config.continue_on_error => {
                    warn!("Stopping batch after failed item");
                    break;
                }
                _ => {}
            }
        }

        if let Some(path) = &self.config.playlist_path {
            self.write_playlist(path, &report).await;
        }

        report
    }

    async fn write_playlist(&self, path: &Path, report: &BatchReport) {
        let written = report.written_paths();
        if let Err(e) = write_aggregate_playlist(path, &written).await {
            warn!(playlist = %path.display(), error = %e, "Failed to write batch playlist");
        }
    }
}
