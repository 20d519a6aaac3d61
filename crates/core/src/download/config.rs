//! Configuration for download backends.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::retry::RetryConfig;

/// Fetch engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadBackend {
    /// In-process HTTP client.
    #[default]
    Builtin,
    /// External accelerator.
    Aria2c,
    /// External simple fetcher.
    Curl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default)]
    pub backend: DownloadBackend,

    #[serde(default = "default_aria2c_path")]
    pub aria2c_path: PathBuf,

    #[serde(default = "default_curl_path")]
    pub curl_path: PathBuf,

    /// Timeout for fetching one URL, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_aria2c_path() -> PathBuf {
    PathBuf::from("aria2c")
}

fn default_curl_path() -> PathBuf {
    PathBuf::from("curl")
}

fn default_timeout() -> u64 {
    600
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            backend: DownloadBackend::default(),
            aria2c_path: default_aria2c_path(),
            curl_path: default_curl_path(),
            timeout_secs: default_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_toml() {
        let config: DownloadConfig = toml::from_str(
            r#"
backend = "aria2c"
timeout_secs = 60

[retry]
max_attempts = 5
"#,
        )
        .unwrap();
        assert_eq!(config.backend, DownloadBackend::Aria2c);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_delay_ms, 1000);
    }
}
