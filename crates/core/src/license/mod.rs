//! License/key acquisition for DRM-protected streams.
//!
//! [`LicenseProvider`] is the pipeline-facing adapter. It is a no-op for
//! DRM-free streams, refuses protected streams when licensing is disabled,
//! and otherwise asks a [`LicenseService`] for the key, retrying only
//! transient failures.

mod config;
mod error;
mod http;
mod provider;
mod traits;
mod types;

pub use config::{DrmMode, LicenseConfig};
pub use error::LicenseError;
pub use http::HttpLicenseService;
pub use provider::LicenseProvider;
pub use traits::LicenseService;
pub use types::{DeviceCredential, LicenseKey, LicenseRequest};

use std::sync::Arc;

/// Builds the provider described by `config`.
///
/// Device mode loads the credential once; disabled mode needs nothing.
pub fn create_license_provider(config: &LicenseConfig) -> Result<LicenseProvider, LicenseError> {
    match config.mode {
        DrmMode::Disabled => Ok(LicenseProvider::disabled()),
        DrmMode::Device => {
            let credential = DeviceCredential::load(&config.device_path)?;
            let service = HttpLicenseService::new(
                config.license_url.clone(),
                credential,
                config.timeout_secs,
            )?;
            Ok(LicenseProvider::new(Arc::new(service), config.retry.clone())
                .with_timeout(config.timeout_secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_create_disabled_provider() {
        let config = LicenseConfig {
            mode: DrmMode::Disabled,
            ..Default::default()
        };
        let provider = create_license_provider(&config).unwrap();
        assert!(!provider.is_enabled());
    }

    #[test]
    fn test_create_device_provider_missing_credential() {
        let config = LicenseConfig {
            mode: DrmMode::Device,
            device_path: PathBuf::from("/nonexistent/device.wvd"),
            license_url: "https://license.test/acquire".to_string(),
            ..Default::default()
        };
        let err = create_license_provider(&config).unwrap_err();
        assert!(matches!(err, LicenseError::CredentialNotFound { .. }));
    }

    #[test]
    fn test_create_device_provider() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"device-blob").unwrap();
        let config = LicenseConfig {
            mode: DrmMode::Device,
            device_path: file.path().to_path_buf(),
            license_url: "https://license.test/acquire".to_string(),
            ..Default::default()
        };
        let provider = create_license_provider(&config).unwrap();
        assert!(provider.is_enabled());
    }
}
