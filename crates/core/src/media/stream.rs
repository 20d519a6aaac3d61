//! Stream descriptors and the quality vocabulary used to choose among them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Audio quality tiers offered by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioQuality {
    VorbisLow,
    VorbisMedium,
    VorbisHigh,
    AacMedium,
    AacHigh,
}

impl AudioQuality {
    /// Whether this tier needs a premium entitlement.
    pub fn requires_premium(&self) -> bool {
        matches!(self, Self::AacHigh | Self::VorbisHigh)
    }

    /// Next lower tier of the same codec family.
    pub fn previous(&self) -> Option<AudioQuality> {
        match self {
            Self::AacHigh => Some(Self::AacMedium),
            Self::VorbisHigh => Some(Self::VorbisMedium),
            Self::VorbisMedium => Some(Self::VorbisLow),
            Self::AacMedium | Self::VorbisLow => None,
        }
    }

    /// Whether this tier is delivered in an mp4 container.
    pub fn is_mp4(&self) -> bool {
        matches!(self, Self::AacMedium | Self::AacHigh)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VorbisLow => "vorbis-low",
            Self::VorbisMedium => "vorbis-medium",
            Self::VorbisHigh => "vorbis-high",
            Self::AacMedium => "aac-medium",
            Self::AacHigh => "aac-high",
        }
    }
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vorbis-low" => Ok(Self::VorbisLow),
            "vorbis-medium" => Ok(Self::VorbisMedium),
            "vorbis-high" => Ok(Self::VorbisHigh),
            "aac-medium" => Ok(Self::AacMedium),
            "aac-high" => Ok(Self::AacHigh),
            other => Err(format!("unknown audio quality: {}", other)),
        }
    }
}

/// Requested video container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    #[default]
    Mp4,
    Webm,
    /// Let the operator choose among the eligible streams.
    Ask,
}

impl VideoFormat {
    /// Container this format restricts candidates to, if any.
    pub fn container(&self) -> Option<Container> {
        match self {
            Self::Mp4 => Some(Container::Mp4),
            Self::Webm => Some(Container::Webm),
            Self::Ask => None,
        }
    }
}

/// Video resolutions, compared by frame height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VideoResolution {
    #[serde(rename = "144p")]
    P144,
    #[serde(rename = "240p")]
    P240,
    #[serde(rename = "360p")]
    P360,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "576p")]
    P576,
    #[serde(rename = "720p")]
    P720,
    #[default]
    #[serde(rename = "1080p")]
    P1080,
}

impl VideoResolution {
    pub fn height(&self) -> u32 {
        match self {
            Self::P144 => 144,
            Self::P240 => 240,
            Self::P360 => 360,
            Self::P480 => 480,
            Self::P576 => 576,
            Self::P720 => 720,
            Self::P1080 => 1080,
        }
    }
}

impl fmt::Display for VideoResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.height())
    }
}

/// Container of a downloaded track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Mp4,
    Webm,
    Ogg,
}

impl Container {
    /// Extension of the raw downloaded file.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Ogg => "ogg",
        }
    }

    /// Extension of the finished audio file.
    pub fn audio_extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "m4a",
            Self::Webm => "webm",
            Self::Ogg => "ogg",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// DRM parameters of a protected stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrmInfo {
    /// Hex key id the license must cover.
    pub key_id: String,
    /// Base64 init data for the license request.
    pub pssh: String,
}

/// Where the bytes of one track come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackSource {
    /// One progressive URL.
    Single { url: String },
    /// Ordered segment URLs, initialisation segment first.
    Segments { urls: Vec<String> },
}

impl TrackSource {
    /// URLs in fetch order.
    pub fn urls(&self) -> &[String] {
        match self {
            Self::Single { url } => std::slice::from_ref(url),
            Self::Segments { urls } => urls,
        }
    }

    pub fn is_segmented(&self) -> bool {
        matches!(self, Self::Segments { .. })
    }
}

/// One concrete, selectable encoding of a media item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub id: String,
    /// Codec name (aac, vorbis, avc1, vp9).
    pub codec: String,
    pub container: Container,
    pub bitrate_kbps: u32,
    /// Tier, for audio streams.
    #[serde(default)]
    pub audio_quality: Option<AudioQuality>,
    /// Resolution, for video streams.
    #[serde(default)]
    pub resolution: Option<VideoResolution>,
    /// Present iff the stream is DRM-protected.
    #[serde(default)]
    pub drm: Option<DrmInfo>,
    pub audio: TrackSource,
    #[serde(default)]
    pub video: Option<TrackSource>,
}

impl StreamDescriptor {
    pub fn is_drm(&self) -> bool {
        self.drm.is_some()
    }

    pub fn is_video(&self) -> bool {
        self.video.is_some()
    }

    /// Extension of the finished media file.
    pub fn output_extension(&self) -> &'static str {
        if self.is_video() {
            "mp4"
        } else {
            self.container.audio_extension()
        }
    }

    /// Short human summary used in prompts and logs.
    pub fn summary(&self) -> String {
        let mut parts = vec![self.codec.clone(), format!("{}kbps", self.bitrate_kbps)];
        if let Some(q) = self.audio_quality {
            parts.push(q.to_string());
        }
        if let Some(r) = self.resolution {
            parts.push(r.to_string());
        }
        parts.push(self.container.to_string());
        if self.is_drm() {
            parts.push("drm".to_string());
        }
        parts.join(" / ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_quality_chain() {
        assert_eq!(AudioQuality::AacHigh.previous(), Some(AudioQuality::AacMedium));
        assert_eq!(
            AudioQuality::VorbisHigh.previous(),
            Some(AudioQuality::VorbisMedium)
        );
        assert_eq!(
            AudioQuality::VorbisMedium.previous(),
            Some(AudioQuality::VorbisLow)
        );
        assert_eq!(AudioQuality::AacMedium.previous(), None);
        assert_eq!(AudioQuality::VorbisLow.previous(), None);
    }

    #[test]
    fn test_audio_quality_premium() {
        assert!(AudioQuality::AacHigh.requires_premium());
        assert!(AudioQuality::VorbisHigh.requires_premium());
        assert!(!AudioQuality::AacMedium.requires_premium());
    }

    #[test]
    fn test_audio_quality_parse() {
        assert_eq!("aac-medium".parse::<AudioQuality>(), Ok(AudioQuality::AacMedium));
        assert!("flac".parse::<AudioQuality>().is_err());
    }

    #[test]
    fn test_resolution_serde_and_order() {
        let r: VideoResolution = serde_json::from_str("\"720p\"").unwrap();
        assert_eq!(r, VideoResolution::P720);
        assert!(VideoResolution::P480 < VideoResolution::P1080);
        assert_eq!(r.to_string(), "720p");
    }

    #[test]
    fn test_track_source_urls() {
        let single = TrackSource::Single {
            url: "https://cdn/a".to_string(),
        };
        assert_eq!(single.urls().len(), 1);
        assert!(!single.is_segmented());

        let json = r#"{"type":"segments","urls":["init","s1","s2"]}"#;
        let segmented: TrackSource = serde_json::from_str(json).unwrap();
        assert_eq!(segmented.urls(), &["init", "s1", "s2"]);
    }

    #[test]
    fn test_output_extension() {
        let mut stream = StreamDescriptor {
            id: "s".to_string(),
            codec: "aac".to_string(),
            container: Container::Mp4,
            bitrate_kbps: 128,
            audio_quality: Some(AudioQuality::AacMedium),
            resolution: None,
            drm: None,
            audio: TrackSource::Single {
                url: "u".to_string(),
            },
            video: None,
        };
        assert_eq!(stream.output_extension(), "m4a");
        stream.container = Container::Ogg;
        assert_eq!(stream.output_extension(), "ogg");
        stream.container = Container::Webm;
        stream.video = Some(TrackSource::Single {
            url: "v".to_string(),
        });
        assert_eq!(stream.output_extension(), "mp4");
    }
}
