//! Spacing between item starts.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Enforces a minimum interval between consecutive starts.
///
/// The first call to [`Pacer::wait`] returns immediately; every later call
/// returns no earlier than `interval` after the previous one returned.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last_start: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_start: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for the next start slot and claims it.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_start {
            let next = last + self.interval;
            if next > Instant::now() {
                let wait = next.saturating_duration_since(Instant::now());
                debug!(wait_ms = wait.as_millis() as u64, "Pacing next item");
                sleep_until(next).await;
            }
        }
        self.last_start = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_start_is_immediate() {
        let mut pacer = Pacer::new(Duration::from_secs(60));
        let start = std::time::Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_spacing_between_starts() {
        let mut pacer = Pacer::new(Duration::from_millis(100));
        let start = std::time::Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_slow_items_are_not_delayed_further() {
        let mut pacer = Pacer::new(Duration::from_millis(50));
        pacer.wait().await;
        tokio::time::sleep(Duration::from_millis(80)).await;
        let start = std::time::Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < Duration::from_millis(40));
    }
}
