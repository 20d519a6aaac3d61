//! Batch configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Sequencing policy for a batch of items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Minimum seconds between the starts of consecutive items.
    #[serde(default = "default_wait_interval")]
    pub wait_interval_secs: f64,

    /// Keep going after a failed item.
    #[serde(default = "default_true")]
    pub continue_on_error: bool,

    /// Aggregate `.m3u8` of every placed item, written when the batch ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_path: Option<PathBuf>,
}

fn default_wait_interval() -> f64 {
    10.0
}

fn default_true() -> bool {
    true
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            wait_interval_secs: default_wait_interval(),
            continue_on_error: true,
            playlist_path: None,
        }
    }
}

impl BatchConfig {
    pub fn with_wait_interval(mut self, secs: f64) -> Self {
        self.wait_interval_secs = secs;
        self
    }

    pub fn with_continue_on_error(mut self, enabled: bool) -> Self {
        self.continue_on_error = enabled;
        self
    }

    /// Wait interval as a duration; invalid values mean no wait.
    pub fn wait_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.wait_interval_secs).unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BatchConfig::default();
        assert_eq!(config.wait_interval(), Duration::from_secs(10));
        assert!(config.continue_on_error);
        assert!(config.playlist_path.is_none());
    }

    #[test]
    fn test_negative_interval_means_no_wait() {
        let config = BatchConfig::default().with_wait_interval(-1.0);
        assert_eq!(config.wait_interval(), Duration::ZERO);
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: BatchConfig = toml::from_str("wait_interval_secs = 0.5").unwrap();
        assert_eq!(config.wait_interval(), Duration::from_millis(500));
        assert!(config.continue_on_error);
    }
}
