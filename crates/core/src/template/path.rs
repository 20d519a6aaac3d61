//! Output path planning.

use std::path::{Path, PathBuf};

use super::config::TemplateConfig;
use super::error::TemplateError;
use super::parser::{is_valid_strftime, Template};
use crate::media::Metadata;

const ILLEGAL_CHAR_REPLACEMENT: char = '_';

/// Smallest truncation limit that is honoured.
const MIN_TRUNCATE: usize = 4;

fn is_illegal(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ';') || c.is_control()
}

/// Cuts `s` to at most `limit` bytes without splitting a character.
pub fn truncate_bytes(s: &str, limit: Option<usize>) -> &str {
    match limit {
        Some(limit) if s.len() > limit => {
            let mut end = limit;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            &s[..end]
        }
        _ => s,
    }
}

/// Sanitises one rendered path segment.
///
/// Illegal characters become `_`. Folder segments (`extension` is `None`)
/// are truncated and a trailing `.` is replaced; file segments reserve room
/// for `.extension` within the limit.
pub fn sanitize_segment(raw: &str, extension: Option<&str>, truncate: Option<usize>) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if is_illegal(c) { ILLEGAL_CHAR_REPLACEMENT } else { c })
        .collect();

    let segment = match extension {
        None => {
            let mut folder = truncate_bytes(&cleaned, truncate).trim().to_string();
            if folder.ends_with('.') {
                folder.pop();
                folder.push(ILLEGAL_CHAR_REPLACEMENT);
            }
            folder
        }
        Some(ext) => {
            let suffix = format!(".{}", ext);
            let limit = truncate.map(|t| t.saturating_sub(suffix.len()));
            let stem = truncate_bytes(&cleaned, limit).trim();
            let stem = if stem.is_empty() {
                ILLEGAL_CHAR_REPLACEMENT.to_string()
            } else {
                stem.to_string()
            };
            return format!("{}{}", stem, suffix);
        }
    };

    if segment.is_empty() {
        ILLEGAL_CHAR_REPLACEMENT.to_string()
    } else {
        segment
    }
}

/// Knobs that decide which sibling paths an [`OutputPlan`] carries.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub output_dir: PathBuf,
    pub save_cover: bool,
    pub save_playlist: bool,
    pub synced_lyrics_file: bool,
}

/// Every destination path of one item, computed before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    /// Folder holding the media file.
    pub folder: PathBuf,
    /// Final media file path.
    pub file: PathBuf,
    pub cover: Option<PathBuf>,
    pub playlist: Option<PathBuf>,
    pub synced_lyrics: Option<PathBuf>,
}

impl OutputPlan {
    /// Media path relative to `output_dir`.
    pub fn relative_file(&self, output_dir: &Path) -> PathBuf {
        self.file
            .strip_prefix(output_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| self.file.clone())
    }
}

/// The compiled template set.
#[derive(Debug, Clone)]
pub struct PathTemplates {
    album_folder: Vec<Template>,
    compilation_folder: Vec<Template>,
    podcast_folder: Vec<Template>,
    no_album_folder: Vec<Template>,
    single_disc_file: Vec<Template>,
    multi_disc_file: Vec<Template>,
    podcast_file: Vec<Template>,
    no_album_file: Vec<Template>,
    playlist_file: Vec<Template>,
    date_tag: String,
    truncate: Option<usize>,
}

fn compile(name: &str, source: &str) -> Result<Vec<Template>, TemplateError> {
    if source.trim().is_empty() {
        return Err(TemplateError::Empty {
            name: name.to_string(),
        });
    }
    source.split('/').map(Template::parse).collect()
}

impl PathTemplates {
    /// Compiles every template, failing on the first invalid one.
    pub fn compile(config: &TemplateConfig) -> Result<Self, TemplateError> {
        if !is_valid_strftime(&config.date_tag) {
            return Err(TemplateError::InvalidFormat {
                field: "date_tag".to_string(),
                spec: config.date_tag.clone(),
                template: config.date_tag.clone(),
            });
        }

        Ok(Self {
            album_folder: compile("album_folder", &config.album_folder)?,
            compilation_folder: compile("compilation_folder", &config.compilation_folder)?,
            podcast_folder: compile("podcast_folder", &config.podcast_folder)?,
            no_album_folder: compile("no_album_folder", &config.no_album_folder)?,
            single_disc_file: compile("single_disc_file", &config.single_disc_file)?,
            multi_disc_file: compile("multi_disc_file", &config.multi_disc_file)?,
            podcast_file: compile("podcast_file", &config.podcast_file)?,
            no_album_file: compile("no_album_file", &config.no_album_file)?,
            playlist_file: compile("playlist_file", &config.playlist_file)?,
            date_tag: config.date_tag.clone(),
            truncate: config.truncate.filter(|t| *t >= MIN_TRUNCATE),
        })
    }

    /// strftime format for the `date` tag.
    pub fn date_tag(&self) -> &str {
        &self.date_tag
    }

    /// Picks the folder and file templates for `metadata`.
    pub fn select(&self, metadata: &Metadata) -> (&[Template], &[Template]) {
        let is_podcast = metadata.kind.map(|k| k.is_podcast()).unwrap_or(false);
        if is_podcast {
            return (&self.podcast_folder, &self.podcast_file);
        }
        if !metadata.has_album() {
            return (&self.no_album_folder, &self.no_album_file);
        }
        let folder = if metadata.compilation {
            &self.compilation_folder
        } else {
            &self.album_folder
        };
        let file = if metadata.is_multi_disc() {
            &self.multi_disc_file
        } else {
            &self.single_disc_file
        };
        (folder, file)
    }

    /// Renders segments into a path under `root`; the last one gets `extension`.
    fn render_path(
        &self,
        root: &Path,
        segments: &[&Template],
        metadata: &Metadata,
        extension: &str,
    ) -> PathBuf {
        let last = segments.len().saturating_sub(1);
        segments
            .iter()
            .enumerate()
            .fold(root.to_path_buf(), |path, (i, template)| {
                let ext = if i == last { Some(extension) } else { None };
                path.join(sanitize_segment(&template.render(metadata), ext, self.truncate))
            })
    }

    /// Renders the media file path for `metadata`.
    pub fn render_file(&self, root: &Path, metadata: &Metadata, extension: &str) -> PathBuf {
        let (folder, file) = self.select(metadata);
        let segments: Vec<&Template> = folder.iter().chain(file.iter()).collect();
        self.render_path(root, &segments, metadata, extension)
    }

    /// Renders the playlist file path for `metadata`.
    pub fn render_playlist(&self, root: &Path, metadata: &Metadata) -> PathBuf {
        let segments: Vec<&Template> = self.playlist_file.iter().collect();
        self.render_path(root, &segments, metadata, "m3u8")
    }

    /// Computes the full [`OutputPlan`] for one item.
    pub fn plan(
        &self,
        metadata: &Metadata,
        extension: &str,
        is_video: bool,
        options: &PlanOptions,
    ) -> OutputPlan {
        let file = self.render_file(&options.output_dir, metadata, extension);
        let folder = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| options.output_dir.clone());

        let cover = options.save_cover.then(|| {
            if is_video {
                file.with_extension("jpg")
            } else {
                folder.join("Cover.jpg")
            }
        });

        let synced_lyrics = (options.synced_lyrics_file && !is_video && metadata.lyrics.has_synced())
            .then(|| file.with_extension("lrc"));

        let playlist = (options.save_playlist && metadata.playlist_title.is_some())
            .then(|| self.render_playlist(&options.output_dir, metadata));

        OutputPlan {
            folder,
            file,
            cover,
            playlist,
            synced_lyrics,
        }
    }
}
