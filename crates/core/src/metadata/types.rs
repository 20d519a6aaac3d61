//! Types for tagging jobs.

use std::path::PathBuf;

use super::tags::TagSet;
use crate::media::Container;

/// One media file to tag.
#[derive(Debug, Clone)]
pub struct TagJob {
    pub item_id: String,
    /// Finished, untagged file inside the item's scratch directory.
    pub media: PathBuf,
    pub container: Container,
    pub is_video: bool,
    pub tags: TagSet,
    /// Cover image to embed, when one was fetched and is not excluded.
    pub cover: Option<PathBuf>,
}
