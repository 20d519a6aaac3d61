//! Layered configuration: defaults, then a TOML file, then `SPINDLE_*`
//! environment variables. CLI flags are applied by the binary on top.

mod loader;
mod types;
mod validate;

pub use loader::{load_config, load_config_from_str};
pub use types::*;
pub use validate::validate_config;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
}

impl From<crate::template::TemplateError> for ConfigError {
    fn from(err: crate::template::TemplateError) -> Self {
        Self::InvalidTemplate(err.to_string())
    }
}
