//! Error types for the item pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::download::DownloadError;
use crate::license::LicenseError;
use crate::metadata::TagError;
use crate::placer::PlacerError;
use crate::quality::QualityError;
use crate::remux::RemuxError;
use crate::template::TemplateError;

/// Failure classification reported per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoEligibleStream,
    DrmRequiredButDisabled,
    LicenseDenied,
    LicenseServiceUnavailable,
    DownloadFailed,
    RemuxFailed,
    IncompatibleRemuxMode,
    TaggingFailed,
    InvalidTemplate,
    MetadataUnavailable,
    PlacementFailed,
    Interrupted,
}

impl ErrorKind {
    /// Transient kinds are the ones stage-local retries already spent a
    /// budget on; everything else is deterministic.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::LicenseServiceUnavailable | Self::DownloadFailed | Self::MetadataUnavailable
        )
    }

    /// Configuration problems rather than item problems.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::IncompatibleRemuxMode | Self::InvalidTemplate)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoEligibleStream => "NoEligibleStream",
            Self::DrmRequiredButDisabled => "DrmRequiredButDisabled",
            Self::LicenseDenied => "LicenseDenied",
            Self::LicenseServiceUnavailable => "LicenseServiceUnavailable",
            Self::DownloadFailed => "DownloadFailed",
            Self::RemuxFailed => "RemuxFailed",
            Self::IncompatibleRemuxMode => "IncompatibleRemuxMode",
            Self::TaggingFailed => "TaggingFailed",
            Self::InvalidTemplate => "InvalidTemplate",
            Self::MetadataUnavailable => "MetadataUnavailable",
            Self::PlacementFailed => "PlacementFailed",
            Self::Interrupted => "Interrupted",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage failure inside one item's pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Quality(#[from] QualityError),

    #[error(transparent)]
    License(#[from] LicenseError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Remux(#[from] RemuxError),

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Placement(#[from] PlacerError),

    /// The scratch directory could not be prepared.
    #[error("Scratch directory error: {0}")]
    Workspace(std::io::Error),

    #[error("Interrupted")]
    Interrupted,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Quality(QualityError::SelectionCancelled) => ErrorKind::Interrupted,
            Self::Quality(_) => ErrorKind::NoEligibleStream,
            Self::License(LicenseError::DrmRequiredButDisabled { .. }) => {
                ErrorKind::DrmRequiredButDisabled
            }
            Self::License(LicenseError::Unavailable { .. }) => ErrorKind::LicenseServiceUnavailable,
            Self::License(_) => ErrorKind::LicenseDenied,
            Self::Download(_) => ErrorKind::DownloadFailed,
            Self::Remux(RemuxError::IncompatibleRemuxMode { .. }) => {
                ErrorKind::IncompatibleRemuxMode
            }
            Self::Remux(_) => ErrorKind::RemuxFailed,
            Self::Tag(_) => ErrorKind::TaggingFailed,
            Self::Template(_) => ErrorKind::InvalidTemplate,
            Self::Catalog(_) => ErrorKind::MetadataUnavailable,
            Self::Placement(_) | Self::Workspace(_) => ErrorKind::PlacementFailed,
            Self::Interrupted => ErrorKind::Interrupted,
        }
    }

    /// Captured tool diagnostics, if any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::Remux(RemuxError::RemuxFailed { stderr, .. }) => stderr.as_deref(),
            Self::Tag(TagError::TaggingFailed { stderr, .. }) => stderr.as_deref(),
            Self::Download(DownloadError::Tool(tool)) => tool.stderr(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::Container;

    #[test]
    fn test_kind_mapping() {
        let cases: Vec<(PipelineError, ErrorKind)> = vec![
            (
                QualityError::no_eligible("x", "none").into(),
                ErrorKind::NoEligibleStream,
            ),
            (
                LicenseError::DrmRequiredButDisabled {
                    stream_id: "s".to_string(),
                }
                .into(),
                ErrorKind::DrmRequiredButDisabled,
            ),
            (LicenseError::denied("no").into(), ErrorKind::LicenseDenied),
            (
                LicenseError::unavailable("503").into(),
                ErrorKind::LicenseServiceUnavailable,
            ),
            (
                DownloadError::Http {
                    url: "u".to_string(),
                    status: 500,
                }
                .into(),
                ErrorKind::DownloadFailed,
            ),
            (
                RemuxError::IncompatibleRemuxMode {
                    mode: "copy".to_string(),
                    container: Container::Mp4,
                }
                .into(),
                ErrorKind::IncompatibleRemuxMode,
            ),
            (
                RemuxError::remux_failed("exit 1", None).into(),
                ErrorKind::RemuxFailed,
            ),
            (
                TagError::tagging_failed("exit 1", None).into(),
                ErrorKind::TaggingFailed,
            ),
            (
                CatalogError::not_found("x").into(),
                ErrorKind::MetadataUnavailable,
            ),
            (PipelineError::Interrupted, ErrorKind::Interrupted),
        ];
        for (error, kind) in cases {
            assert_eq!(error.kind(), kind, "{}", error);
        }
    }

    #[test]
    fn test_transient_kinds() {
        assert!(ErrorKind::LicenseServiceUnavailable.is_transient());
        assert!(ErrorKind::DownloadFailed.is_transient());
        assert!(!ErrorKind::RemuxFailed.is_transient());
        assert!(!ErrorKind::LicenseDenied.is_transient());
        assert!(ErrorKind::IncompatibleRemuxMode.is_configuration());
    }

    #[test]
    fn test_diagnostics_surface_stderr() {
        let error: PipelineError =
            RemuxError::remux_failed("exit 1", Some("moov atom not found".to_string())).into();
        assert_eq!(error.diagnostics(), Some("moov atom not found"));
    }
}
