//! Template segment parsing and rendering.

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use regex_lite::Regex;
use std::fmt::Write;

use super::error::TemplateError;
use crate::media::Metadata;

/// Fields available to path templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateField {
    Album,
    AlbumArtist,
    Artist,
    Composer,
    Date,
    Disc,
    DiscTotal,
    Genre,
    Isrc,
    Label,
    MediaId,
    MediaType,
    PlaylistArtist,
    PlaylistId,
    PlaylistTitle,
    PlaylistTrack,
    PlaylistTrackTotal,
    Producer,
    Publisher,
    Rating,
    Title,
    Track,
    TrackTotal,
}

impl TemplateField {
    pub fn from_name(name: &str) -> Option<Self> {
        let field = match name {
            "album" => Self::Album,
            "album_artist" => Self::AlbumArtist,
            "artist" => Self::Artist,
            "composer" => Self::Composer,
            "date" => Self::Date,
            "disc" => Self::Disc,
            "disc_total" => Self::DiscTotal,
            "genre" => Self::Genre,
            "isrc" => Self::Isrc,
            "label" => Self::Label,
            "media_id" => Self::MediaId,
            "media_type" => Self::MediaType,
            "playlist_artist" => Self::PlaylistArtist,
            "playlist_id" => Self::PlaylistId,
            "playlist_title" => Self::PlaylistTitle,
            "playlist_track" => Self::PlaylistTrack,
            "playlist_track_total" => Self::PlaylistTrackTotal,
            "producer" => Self::Producer,
            "publisher" => Self::Publisher,
            "rating" => Self::Rating,
            "title" => Self::Title,
            "track" => Self::Track,
            "track_total" => Self::TrackTotal,
            _ => return None,
        };
        Some(field)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Disc
                | Self::DiscTotal
                | Self::Track
                | Self::TrackTotal
                | Self::PlaylistTrack
                | Self::PlaylistTrackTotal
        )
    }

    /// Text rendered when the metadata has no value.
    pub fn fallback(&self) -> &'static str {
        match self {
            Self::Album => "Unknown Album",
            Self::AlbumArtist | Self::Artist => "Unknown Artist",
            Self::Composer => "Unknown Composer",
            Self::Date => "Unknown Date",
            Self::Genre => "Unknown Genre",
            Self::Isrc => "Unknown ISRC",
            Self::Label => "Unknown Label",
            Self::MediaId => "Unknown Media ID",
            Self::MediaType => "Unknown Media Type",
            Self::PlaylistArtist => "Unknown Playlist Artist",
            Self::PlaylistId => "Unknown Playlist ID",
            Self::PlaylistTitle => "Unknown Playlist Title",
            Self::Producer => "Unknown Producer",
            Self::Publisher => "Unknown Publisher",
            Self::Rating => "Unknown Rating",
            Self::Title => "Unknown Title",
            Self::Disc
            | Self::DiscTotal
            | Self::Track
            | Self::TrackTotal
            | Self::PlaylistTrack
            | Self::PlaylistTrackTotal => "",
        }
    }

    fn value(&self, metadata: &Metadata) -> Value {
        let text = |v: &Option<String>| v.clone().map(Value::Text).unwrap_or(Value::Missing);
        let number = |v: Option<u32>| v.map(Value::Number).unwrap_or(Value::Missing);
        match self {
            Self::Album => text(&metadata.album),
            Self::AlbumArtist => text(&metadata.album_artist()),
            Self::Artist => text(&metadata.artist()),
            Self::Composer => text(&metadata.composer),
            Self::Date => metadata.date.map(Value::Date).unwrap_or(Value::Missing),
            Self::Disc => number(metadata.disc),
            Self::DiscTotal => number(metadata.disc_total),
            Self::Genre => text(&metadata.genre),
            Self::Isrc => text(&metadata.isrc),
            Self::Label => text(&metadata.label),
            Self::MediaId if metadata.media_id.is_empty() => Value::Missing,
            Self::MediaId => Value::Text(metadata.media_id.clone()),
            Self::MediaType => metadata
                .kind
                .map(|k| Value::Text(k.to_string()))
                .unwrap_or(Value::Missing),
            Self::PlaylistArtist => text(&metadata.playlist_artist),
            Self::PlaylistId => text(&metadata.playlist_id),
            Self::PlaylistTitle => text(&metadata.playlist_title),
            Self::PlaylistTrack => number(metadata.playlist_track),
            Self::PlaylistTrackTotal => number(metadata.playlist_track_total),
            Self::Producer => text(&metadata.producer),
            Self::Publisher => text(&metadata.publisher),
            Self::Rating => metadata
                .rating
                .label()
                .map(|label| Value::Text(label.to_string()))
                .unwrap_or(Value::Missing),
            Self::Title => text(&metadata.title),
            Self::Track => number(metadata.track),
            Self::TrackTotal => number(metadata.track_total),
        }
    }
}

enum Value {
    Text(String),
    Number(u32),
    Date(NaiveDate),
    Missing,
}

/// Formatting directive attached to a field token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSpec {
    Plain,
    /// Minimum width for numbers, padded with zeros or spaces.
    Width { width: usize, zero: bool },
    /// strftime format for dates.
    Date(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Field { field: TemplateField, spec: FormatSpec },
}

/// One compiled path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    parts: Vec<Part>,
}

impl Template {
    /// Compiles a single segment.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let unbalanced = || TemplateError::Unbalanced {
            template: source.to_string(),
        };

        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(unbalanced()),
                '{' => {
                    let mut token = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        if inner == '{' {
                            return Err(unbalanced());
                        }
                        token.push(inner);
                    }
                    if !closed {
                        return Err(unbalanced());
                    }
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(parse_token(&token, source)?);
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Fields referenced by this segment, in order.
    pub fn fields(&self) -> impl Iterator<Item = TemplateField> + '_ {
        self.parts.iter().filter_map(|p| match p {
            Part::Field { field, .. } => Some(*field),
            Part::Literal(_) => None,
        })
    }

    /// Renders the segment. The result is not yet sanitised.
    pub fn render(&self, metadata: &Metadata) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Field { field, spec } => out.push_str(&render_field(*field, spec, metadata)),
            }
        }
        out
    }

    /// Recovers field values from a rendered segment.
    ///
    /// Returns `None` if `rendered` could not have come from this template.
    pub fn parse_back(&self, rendered: &str) -> Option<Vec<(TemplateField, String)>> {
        let mut pattern = String::from("^");
        for part in &self.parts {
            match part {
                Part::Literal(text) => pattern.push_str(&regex_lite::escape(text)),
                Part::Field { field, .. } if field.is_numeric() => pattern.push_str(r"\s*(\d*)"),
                Part::Field { .. } => pattern.push_str("(.*?)"),
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).ok()?;
        let captures = regex.captures(rendered)?;
        Some(
            self.fields()
                .enumerate()
                .map(|(i, field)| {
                    let value = captures
                        .get(i + 1)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default();
                    (field, value)
                })
                .collect(),
        )
    }
}

/// Renders one field exactly as it appears inside a template.
pub(crate) fn render_field(field: TemplateField, spec: &FormatSpec, metadata: &Metadata) -> String {
    match (field.value(metadata), spec) {
        (Value::Missing, _) => field.fallback().to_string(),
        (Value::Text(text), _) => text,
        (Value::Number(n), FormatSpec::Width { width, zero: true }) => {
            format!("{:0width$}", n, width = *width)
        }
        (Value::Number(n), FormatSpec::Width { width, zero: false }) => {
            format!("{:width$}", n, width = *width)
        }
        (Value::Number(n), _) => n.to_string(),
        (Value::Date(date), FormatSpec::Date(format)) => format_date(date, format),
        (Value::Date(date), _) => format_date(date, "%Y-%m-%d"),
    }
}

/// Formats `date` at midnight UTC; specifiers that need an offset yield the ISO date.
pub(crate) fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    let Some(datetime) = date.and_hms_opt(0, 0, 0) else {
        return date.to_string();
    };
    match write!(out, "{}", datetime.format(format)) {
        Ok(()) => out,
        Err(_) => date.to_string(),
    }
}

fn parse_token(token: &str, template: &str) -> Result<Part, TemplateError> {
    let (name, spec) = match token.split_once(':') {
        Some((name, spec)) => (name.trim(), Some(spec)),
        None => (token.trim(), None),
    };

    let field = TemplateField::from_name(name).ok_or_else(|| TemplateError::UnknownField {
        field: name.to_string(),
        template: template.to_string(),
    })?;

    let invalid = |spec: &str| TemplateError::InvalidFormat {
        field: name.to_string(),
        spec: spec.to_string(),
        template: template.to_string(),
    };

    let spec = match spec {
        None => FormatSpec::Plain,
        Some(spec) if field.is_numeric() => parse_number_spec(spec).ok_or_else(|| invalid(spec))?,
        Some(spec) if field == TemplateField::Date => {
            if !is_valid_strftime(spec) {
                return Err(invalid(spec));
            }
            FormatSpec::Date(spec.to_string())
        }
        Some(spec) => return Err(invalid(spec)),
    };

    Ok(Part::Field { field, spec })
}

/// Accepts `d`, `Nd` and `0Nd`.
fn parse_number_spec(spec: &str) -> Option<FormatSpec> {
    let digits = spec.strip_suffix('d')?;
    if digits.is_empty() {
        return Some(FormatSpec::Plain);
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let zero = digits.starts_with('0') && digits.len() > 1;
    let width = digits.parse().ok()?;
    Some(FormatSpec::Width { width, zero })
}

pub(crate) fn is_valid_strftime(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
