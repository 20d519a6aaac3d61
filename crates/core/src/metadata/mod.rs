//! Metadata and tag resolution.
//!
//! [`MetadataResolver`] turns a catalog item into a complete [`Metadata`]
//! record (lyrics and playlist position included) and fetches its cover.
//! [`TagSet`] maps that record onto the tag keys actually written, after
//! `exclude` filtering, and a [`Tagger`] writes them onto the finished file.
//!
//! [`Metadata`]: crate::media::Metadata

mod config;
mod error;
mod ffmpeg;
mod resolver;
mod tags;
mod traits;
mod types;

pub use config::{LyricsFallback, TagConfig};
pub use error::TagError;
pub use ffmpeg::FfmpegTagger;
pub use resolver::MetadataResolver;
pub use tags::{TagSet, TAG_KEYS};
pub use traits::Tagger;
pub use types::TagJob;
