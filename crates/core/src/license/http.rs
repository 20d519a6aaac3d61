//! HTTP license service.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use super::error::LicenseError;
use super::traits::LicenseService;
use super::types::{DeviceCredential, LicenseKey, LicenseRequest};

#[derive(Debug, Deserialize)]
struct LicenseResponse {
    key_id: String,
    key: String,
}

/// Posts the init data and device credential to a license endpoint.
pub struct HttpLicenseService {
    client: reqwest::Client,
    url: String,
    credential: DeviceCredential,
}

impl HttpLicenseService {
    pub fn new(
        url: String,
        credential: DeviceCredential,
        timeout_secs: u64,
    ) -> Result<Self, LicenseError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LicenseError::unavailable(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url,
            credential,
        })
    }
}

#[async_trait]
impl LicenseService for HttpLicenseService {
    fn name(&self) -> &str {
        "http"
    }

    async fn acquire(&self, request: &LicenseRequest) -> Result<LicenseKey, LicenseError> {
        let form = Form::new()
            .part(
                "device",
                Part::bytes(self.credential.as_bytes().to_vec()).file_name("device"),
            )
            .text("pssh", request.pssh.clone())
            .text("key_id", request.key_id.clone());

        let url = format!(
            "{}?stream={}",
            self.url,
            urlencoding::encode(&request.stream_id)
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| LicenseError::unavailable(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(LicenseError::denied(format!("HTTP {}", status)));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(LicenseError::unavailable(format!("HTTP {}", status)));
            }
            s if s.is_server_error() => {
                return Err(LicenseError::unavailable(format!("HTTP {}", status)));
            }
            s if !s.is_success() => {
                return Err(LicenseError::denied(format!("HTTP {}", status)));
            }
            _ => {}
        }

        let body: LicenseResponse = response
            .json()
            .await
            .map_err(|e| LicenseError::invalid_response(e.to_string()))?;

        if body.key.is_empty() {
            return Err(LicenseError::invalid_response("empty key"));
        }

        Ok(LicenseKey::new(
            request.stream_id.clone(),
            body.key_id,
            body.key,
        ))
    }
}
