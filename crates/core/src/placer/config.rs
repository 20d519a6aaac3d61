//! Configuration for the placer module.

use serde::{Deserialize, Serialize};

/// Configuration for the file system placer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacerConfig {
    /// Buffer size for cross-filesystem copies in bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Compare sha256 of source and destination after placing.
    #[serde(default)]
    pub verify_checksum: bool,
}

fn default_buffer_size() -> usize {
    8 * 1024 * 1024 // 8 MB
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            verify_checksum: false,
        }
    }
}

impl PlacerConfig {
    /// Enables checksum verification.
    pub fn with_checksum_verification(mut self, enabled: bool) -> Self {
        self.verify_checksum = enabled;
        self
    }

    /// Sets the buffer size for copies.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlacerConfig::default();
        assert_eq!(config.buffer_size, 8 * 1024 * 1024);
        assert!(!config.verify_checksum);
    }

    #[test]
    fn test_config_builder() {
        let config = PlacerConfig::default()
            .with_checksum_verification(true)
            .with_buffer_size(1024);
        assert!(config.verify_checksum);
        assert_eq!(config.buffer_size, 1024);
    }
}
