//! Quality negotiation.
//!
//! Picks exactly one [`StreamDescriptor`](crate::media::StreamDescriptor)
//! out of the catalog's candidates, honouring the requested tier or
//! resolution, the caller's entitlement and the DRM policy. In ask mode the
//! final pick is delegated to a [`CodecChooser`].

mod config;
mod error;
mod negotiator;
mod traits;

pub use config::{QualityConfig, SelectionMode};
pub use error::QualityError;
pub use negotiator::{NegotiatedStream, QualityNegotiator};
pub use traits::CodecChooser;
