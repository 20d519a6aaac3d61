//! License service seam.

use async_trait::async_trait;

use super::error::LicenseError;
use super::types::{LicenseKey, LicenseRequest};

/// Performs one license handshake.
#[async_trait]
pub trait LicenseService: Send + Sync {
    /// Returns the name of this service implementation.
    fn name(&self) -> &str;

    /// Exchanges the stream's init data for its content key.
    async fn acquire(&self, request: &LicenseRequest) -> Result<LicenseKey, LicenseError>;
}
