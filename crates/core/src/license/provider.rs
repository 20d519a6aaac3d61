//! Pipeline-facing license adapter.

use std::sync::Arc;
use std::time::Duration;

use super::error::LicenseError;
use super::traits::LicenseService;
use super::types::{LicenseKey, LicenseRequest};
use crate::media::StreamDescriptor;
use crate::retry::{with_retry, RetryConfig};

/// Resolves the key, if any, needed to decrypt a stream.
pub struct LicenseProvider {
    service: Option<Arc<dyn LicenseService>>,
    retry: RetryConfig,
    timeout: Duration,
}

impl std::fmt::Debug for LicenseProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseProvider")
            .field("service", &self.service.as_ref().map(|s| s.name()))
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LicenseProvider {
    /// A provider backed by `service`.
    pub fn new(service: Arc<dyn LicenseService>, retry: RetryConfig) -> Self {
        Self {
            service: Some(service),
            retry,
            timeout: Duration::from_secs(30),
        }
    }

    /// A provider that refuses every protected stream.
    pub fn disabled() -> Self {
        Self {
            service: None,
            retry: RetryConfig::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the per-attempt timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = Duration::from_secs(timeout_secs);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.service.is_some()
    }

    /// Returns the key for `stream`, or `None` if it is not protected.
    ///
    /// The service is never contacted for DRM-free streams.
    pub async fn provide(
        &self,
        stream: &StreamDescriptor,
    ) -> Result<Option<LicenseKey>, LicenseError> {
        let Some(request) = LicenseRequest::for_stream(stream) else {
            tracing::debug!(stream_id = %stream.id, "Stream is DRM-free, no license needed");
            return Ok(None);
        };

        let Some(service) = &self.service else {
            return Err(LicenseError::DrmRequiredButDisabled {
                stream_id: stream.id.clone(),
            });
        };

        let timeout = self.timeout;
        let key = with_retry(&self.retry, "license", || {
            let service = service.clone();
            let request = request.clone();
            async move {
                match tokio::time::timeout(timeout, service.acquire(&request)).await {
                    Ok(result) => result,
                    Err(_) => Err(LicenseError::unavailable(format!(
                        "no response within {} seconds",
                        timeout.as_secs()
                    ))),
                }
            }
        })
        .await?;

        if !key.is_bound_to(stream) {
            return Err(LicenseError::invalid_response(format!(
                "key issued for {} instead of {}",
                key.stream_id(),
                stream.id
            )));
        }

        tracing::info!(stream_id = %stream.id, service = service.name(), "License acquired");
        Ok(Some(key))
    }
}
