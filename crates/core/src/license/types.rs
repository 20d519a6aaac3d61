//! License request and key types.

use std::fmt;
use std::path::Path;

use super::error::LicenseError;
use crate::media::StreamDescriptor;

/// Device credential used to sign license requests.
#[derive(Clone)]
pub struct DeviceCredential {
    bytes: Vec<u8>,
}

impl DeviceCredential {
    /// Loads the credential file.
    pub fn load(path: &Path) -> Result<Self, LicenseError> {
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LicenseError::CredentialNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LicenseError::InvalidCredential {
                    reason: e.to_string(),
                }
            }
        })?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, LicenseError> {
        if bytes.is_empty() {
            return Err(LicenseError::InvalidCredential {
                reason: "credential is empty".to_string(),
            });
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for DeviceCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceCredential")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Everything the license service needs for one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseRequest {
    pub stream_id: String,
    pub key_id: String,
    pub pssh: String,
}

impl LicenseRequest {
    /// Builds the request for a protected stream; `None` for DRM-free streams.
    pub fn for_stream(stream: &StreamDescriptor) -> Option<Self> {
        stream.drm.as_ref().map(|drm| Self {
            stream_id: stream.id.clone(),
            key_id: drm.key_id.clone(),
            pssh: drm.pssh.clone(),
        })
    }
}

/// Content key for exactly one stream.
///
/// Neither `Clone` nor serialisable: the key moves into the remux job that
/// consumes it and is dropped with it.
pub struct LicenseKey {
    stream_id: String,
    key_id: String,
    key: String,
}

impl LicenseKey {
    pub fn new(
        stream_id: impl Into<String>,
        key_id: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            stream_id: stream_id.into(),
            key_id: key_id.into(),
            key: key.into(),
        }
    }

    /// Id of the stream this key was issued for.
    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Hex key material.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether this key was issued for `stream`.
    pub fn is_bound_to(&self, stream: &StreamDescriptor) -> bool {
        self.stream_id == stream.id
    }
}

impl fmt::Debug for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LicenseKey")
            .field("stream_id", &self.stream_id)
            .field("key_id", &self.key_id)
            .field("key", &"<redacted>")
            .finish()
    }
}
