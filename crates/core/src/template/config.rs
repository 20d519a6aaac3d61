//! Template configuration.

use serde::{Deserialize, Serialize};

/// Folder, file and tag templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Folder for items that belong to a regular album.
    #[serde(default = "default_album_folder")]
    pub album_folder: String,

    /// Folder for items on a compilation album.
    #[serde(default = "default_compilation_folder")]
    pub compilation_folder: String,

    /// Folder for podcast episodes.
    #[serde(default = "default_podcast_folder")]
    pub podcast_folder: String,

    /// Folder for items without an album.
    #[serde(default = "default_no_album_folder")]
    pub no_album_folder: String,

    /// File name when the album has a single disc.
    #[serde(default = "default_single_disc_file")]
    pub single_disc_file: String,

    /// File name when the album spans several discs.
    #[serde(default = "default_multi_disc_file")]
    pub multi_disc_file: String,

    #[serde(default = "default_podcast_file")]
    pub podcast_file: String,

    #[serde(default = "default_no_album_file")]
    pub no_album_file: String,

    /// Playlist file path, without the `.m3u8` extension.
    #[serde(default = "default_playlist_file")]
    pub playlist_file: String,

    /// strftime format of the `date` tag.
    #[serde(default = "default_date_tag")]
    pub date_tag: String,

    /// Maximum byte length of each path segment. Values below 4 disable truncation.
    #[serde(default)]
    pub truncate: Option<usize>,
}

fn default_album_folder() -> String {
    "{album_artist}/{album}".to_string()
}

fn default_compilation_folder() -> String {
    "Compilations/{album}".to_string()
}

fn default_podcast_folder() -> String {
    "Podcasts/{album}".to_string()
}

fn default_no_album_folder() -> String {
    "{artist}/Unknown Album".to_string()
}

fn default_single_disc_file() -> String {
    "{track:02d} {title}".to_string()
}

fn default_multi_disc_file() -> String {
    "{disc}-{track:02d} {title}".to_string()
}

fn default_podcast_file() -> String {
    "{track:02d} {title}".to_string()
}

fn default_no_album_file() -> String {
    "{title}".to_string()
}

fn default_playlist_file() -> String {
    "Playlists/{playlist_artist}/{playlist_title}".to_string()
}

fn default_date_tag() -> String {
    "%Y-%m-%dT%H:%M:%SZ".to_string()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            album_folder: default_album_folder(),
            compilation_folder: default_compilation_folder(),
            podcast_folder: default_podcast_folder(),
            no_album_folder: default_no_album_folder(),
            single_disc_file: default_single_disc_file(),
            multi_disc_file: default_multi_disc_file(),
            podcast_file: default_podcast_file(),
            no_album_file: default_no_album_file(),
            playlist_file: default_playlist_file(),
            date_tag: default_date_tag(),
            truncate: None,
        }
    }
}

impl TemplateConfig {
    /// Sets the per-segment truncation limit.
    pub fn with_truncate(mut self, truncate: usize) -> Self {
        self.truncate = Some(truncate);
        self
    }

    /// Named path templates, for validation and error reporting.
    pub fn named_paths(&self) -> [(&'static str, &str); 9] {
        [
            ("album_folder", &self.album_folder),
            ("compilation_folder", &self.compilation_folder),
            ("podcast_folder", &self.podcast_folder),
            ("no_album_folder", &self.no_album_folder),
            ("single_disc_file", &self.single_disc_file),
            ("multi_disc_file", &self.multi_disc_file),
            ("podcast_file", &self.podcast_file),
            ("no_album_file", &self.no_album_file),
            ("playlist_file", &self.playlist_file),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TemplateConfig::default();
        assert_eq!(config.album_folder, "{album_artist}/{album}");
        assert_eq!(config.single_disc_file, "{track:02d} {title}");
        assert_eq!(config.truncate, None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: TemplateConfig = toml::from_str(r#"no_album_file = "{artist} - {title}""#).unwrap();
        assert_eq!(config.no_album_file, "{artist} - {title}");
        assert_eq!(config.multi_disc_file, "{disc}-{track:02d} {title}");
    }
}
