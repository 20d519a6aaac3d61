//! Mock license service for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::license::{LicenseError, LicenseKey, LicenseRequest, LicenseService};

/// Content key handed out by [`MockLicenseService`].
pub const MOCK_CONTENT_KEY: &str = "00112233445566778899aabbccddeeff";

/// Mock implementation of the LicenseService trait.
///
/// Issues [`MOCK_CONTENT_KEY`] bound to the requested stream unless an
/// error was queued with [`push_error`](Self::push_error).
#[derive(Debug, Default)]
pub struct MockLicenseService {
    requests: Arc<RwLock<Vec<LicenseRequest>>>,
    errors: Arc<RwLock<VecDeque<LicenseError>>>,
}

impl MockLicenseService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_error(&self, error: LicenseError) {
        self.errors.write().await.push_back(error);
    }

    /// Number of acquire calls, failed ones included.
    pub async fn call_count(&self) -> usize {
        self.requests.read().await.len()
    }

    pub async fn recorded_requests(&self) -> Vec<LicenseRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl LicenseService for MockLicenseService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn acquire(&self, request: &LicenseRequest) -> Result<LicenseKey, LicenseError> {
        self.requests.write().await.push(request.clone());

        if let Some(error) = self.errors.write().await.pop_front() {
            return Err(error);
        }
        Ok(LicenseKey::new(
            request.stream_id.clone(),
            request.key_id.clone(),
            MOCK_CONTENT_KEY,
        ))
    }
}
