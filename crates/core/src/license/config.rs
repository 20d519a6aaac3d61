//! Configuration for license acquisition.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::retry::RetryConfig;

/// Whether protected streams can be licensed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrmMode {
    /// Acquire keys with the configured device credential.
    #[default]
    Device,
    /// Never acquire keys; protected streams fail.
    Disabled,
}

/// License service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseConfig {
    #[serde(default)]
    pub mode: DrmMode,

    /// Device credential file.
    #[serde(default = "default_device_path")]
    pub device_path: PathBuf,

    /// License endpoint.
    #[serde(default)]
    pub license_url: String,

    /// Timeout for a single license request in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_device_path() -> PathBuf {
    PathBuf::from("device.wvd")
}

fn default_timeout() -> u64 {
    30
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            mode: DrmMode::default(),
            device_path: default_device_path(),
            license_url: String::new(),
            timeout_secs: default_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

impl LicenseConfig {
    pub fn is_enabled(&self) -> bool {
        self.mode == DrmMode::Device
    }
}
