//! Mapping from [`Metadata`] to the written tag set.

use super::config::{LyricsFallback, TagConfig};
use crate::media::{MediaKind, MediaRating, Metadata};
use crate::template::format_date;

/// Every key `exclude` can name, besides `all` and `cover`.
pub const TAG_KEYS: &[&str] = &[
    "album",
    "album_artist",
    "artist",
    "compilation",
    "composer",
    "copyright",
    "date",
    "description",
    "disc",
    "disc_total",
    "genre",
    "isrc",
    "label",
    "lyrics",
    "media_type",
    "producer",
    "publisher",
    "rating",
    "title",
    "track",
    "track_total",
    "url",
];

/// Ordered key/value pairs to embed, plus whether to embed the cover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    entries: Vec<(String, String)>,
    cover: bool,
}

impl TagSet {
    /// Builds the tag set for `metadata`, leaving out excluded keys.
    ///
    /// Path templates keep using the full metadata; exclusion only affects
    /// what is written into the file.
    pub fn build(metadata: &Metadata, config: &TagConfig, date_format: &str) -> Self {
        let mut set = Self {
            entries: Vec::new(),
            cover: !config.excludes("cover"),
        };
        let mut push = |key: &str, value: Option<String>| {
            if config.excludes(key) {
                return;
            }
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                set.entries.push((key.to_string(), value));
            }
        };

        push("title", metadata.title.clone());
        push("artist", metadata.artist());
        push("album", metadata.album.clone());
        push("album_artist", metadata.album_artist());
        push("composer", metadata.composer.clone());
        push("producer", metadata.producer.clone());
        push("publisher", metadata.publisher.clone());
        push("label", metadata.label.clone());
        push("copyright", metadata.copyright.clone());
        push("genre", metadata.genre.clone());
        push("description", metadata.description.clone());
        push("isrc", metadata.isrc.clone());
        push("url", metadata.url.clone());
        push(
            "track",
            numbered(metadata.track, metadata.track_total, config.excludes("track_total")),
        );
        push(
            "disc",
            numbered(metadata.disc, metadata.disc_total, config.excludes("disc_total")),
        );
        push("compilation", metadata.compilation.then(|| "1".to_string()));
        push("rating", rating(metadata.rating));
        push("media_type", metadata.kind.map(media_type));
        push(
            "date",
            metadata.date.map(|date| format_date(date, date_format)),
        );
        push("lyrics", lyrics(metadata, config.lyrics_fallback));

        set
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether cover art may be embedded.
    pub fn embeds_cover(&self) -> bool {
        self.cover
    }

    /// `-metadata key=value` pairs for ffmpeg.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(key, value)| ["-metadata".to_string(), format!("{}={}", key, value)])
            .collect()
    }
}

fn numbered(number: Option<u32>, total: Option<u32>, hide_total: bool) -> Option<String> {
    let number = number?;
    match total {
        Some(total) if !hide_total => Some(format!("{}/{}", number, total)),
        _ => Some(number.to_string()),
    }
}

fn rating(rating: MediaRating) -> Option<String> {
    match rating {
        MediaRating::None => None,
        other => Some(other.tag_value().to_string()),
    }
}

/// iTunes `stik` values.
fn media_type(kind: MediaKind) -> String {
    match kind {
        MediaKind::MusicVideo => "6",
        MediaKind::PodcastEpisode | MediaKind::PodcastVideo | MediaKind::PodcastSeries => "21",
        _ => "1",
    }
    .to_string()
}

fn lyrics(metadata: &Metadata, fallback: LyricsFallback) -> Option<String> {
    if metadata.lyrics.has_synced() {
        return metadata.lyrics.plain_text();
    }
    match fallback {
        LyricsFallback::Plain => metadata.lyrics.plain.clone(),
        LyricsFallback::None => None,
    }
}
