use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::batch::BatchConfig;
use crate::catalog::CatalogConfig;
use crate::download::DownloadConfig;
use crate::license::LicenseConfig;
use crate::metadata::TagConfig;
use crate::pipeline::OutputConfig;
use crate::quality::QualityConfig;
use crate::remux::RemuxConfig;
use crate::template::TemplateConfig;

/// Root configuration. Every section is optional in the file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub quality: QualityConfig,
    #[serde(default)]
    pub drm: LicenseConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub remux: RemuxConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
    #[serde(default)]
    pub tags: TagConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also append log lines to this file.
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Config as printed at start-up (license endpoint redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub output: OutputConfig,
    pub quality: QualityConfig,
    pub drm: SanitizedDrmConfig,
    pub remux: RemuxConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedDrmConfig {
    pub mode: String,
    pub device_path: PathBuf,
    pub license_url: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let license_url = if config.drm.license_url.is_empty() {
            String::new()
        } else {
            "[REDACTED]".to_string()
        };
        Self {
            output: config.output.clone(),
            quality: config.quality.clone(),
            drm: SanitizedDrmConfig {
                mode: format!("{:?}", config.drm.mode).to_lowercase(),
                device_path: config.drm.device_path.clone(),
                license_url,
            },
            remux: config.remux.clone(),
            batch: config.batch.clone(),
        }
    }
}
