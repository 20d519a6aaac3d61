//! Catalog URL parsing.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::types::MediaKind;

static MEDIA_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://open\.[\w.-]+/(?:intl-\w+/)?(?:embed/)?(album|playlist|track|show|episode|artist)/(\w{22})",
    )
    .expect("media url pattern is valid")
});

/// Identity extracted from a catalog URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrl {
    pub kind: MediaKind,
    pub id: String,
}

/// Parses a catalog URL into its media kind and id.
///
/// `track` URLs map to songs and `show` URLs to podcast series; whether a
/// track is a music video or an episode is a video is only known after
/// the catalog resolves it.
pub fn parse_media_url(url: &str) -> Option<MediaUrl> {
    let captures = MEDIA_URL.captures(url.trim())?;
    let kind = match &captures[1] {
        "album" => MediaKind::Album,
        "playlist" => MediaKind::Playlist,
        "track" => MediaKind::Song,
        "show" => MediaKind::PodcastSeries,
        "episode" => MediaKind::PodcastEpisode,
        "artist" => MediaKind::Artist,
        _ => return None,
    };
    Some(MediaUrl {
        kind,
        id: captures[2].to_string(),
    })
}
