//! ffmpeg-based tagger.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::time::Duration;
use tracing::debug;

use super::error::TagError;
use super::traits::Tagger;
use super::types::TagJob;
use crate::media::Container;
use crate::process::{check_tool, run_tool};

/// Rewrites the file with a clean metadata block and stream copy.
pub struct FfmpegTagger {
    ffmpeg_path: PathBuf,
    watchdog: Duration,
}

impl FfmpegTagger {
    pub fn new(ffmpeg_path: PathBuf, watchdog_secs: u64) -> Self {
        Self {
            ffmpeg_path,
            watchdog: Duration::from_secs(watchdog_secs),
        }
    }

    /// Cover art is embedded only into mp4 containers.
    fn embedded_cover(job: &TagJob) -> Option<&Path> {
        if job.container != Container::Mp4 || !job.tags.embeds_cover() {
            return None;
        }
        job.cover.as_deref()
    }

    fn build_args(job: &TagJob, output: &Path) -> Vec<String> {
        let mut args = vec![
            "-loglevel".to_string(),
            "error".to_string(),
            "-hide_banner".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            job.media.to_string_lossy().to_string(),
        ];

        match Self::embedded_cover(job) {
            Some(cover) => {
                // The picture lands after the video track when there is one.
                let (source, picture) = if job.is_video {
                    ("0", "-disposition:v:1")
                } else {
                    ("0:a", "-disposition:v:0")
                };
                args.extend([
                    "-i".to_string(),
                    cover.to_string_lossy().to_string(),
                    "-map".to_string(),
                    source.to_string(),
                    "-map".to_string(),
                    "1:v".to_string(),
                    "-c".to_string(),
                    "copy".to_string(),
                    picture.to_string(),
                    "attached_pic".to_string(),
                ]);
            }
            None => args.extend([
                "-map".to_string(),
                "0".to_string(),
                "-c".to_string(),
                "copy".to_string(),
            ]),
        }

        args.extend(["-map_metadata".to_string(), "-1".to_string()]);
        args.extend(job.tags.to_ffmpeg_args());

        if job.container == Container::Mp4 {
            args.extend(["-movflags".to_string(), "use_metadata_tags".to_string()]);
        }

        args.push(output.to_string_lossy().to_string());
        args
    }

    fn tagged_path(media: &Path) -> PathBuf {
        let stem = media
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "media".to_string());
        match media.extension() {
            Some(ext) => media.with_file_name(format!("{}_tagged.{}", stem, ext.to_string_lossy())),
            None => media.with_file_name(format!("{}_tagged", stem)),
        }
    }
}

#[async_trait]
impl Tagger for FfmpegTagger {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn tag(&self, job: &TagJob) -> Result<(), TagError> {
        if !job.media.exists() {
            return Err(TagError::MediaNotFound {
                path: job.media.clone(),
            });
        }
        if job.tags.is_empty() && Self::embedded_cover(job).is_none() {
            debug!(item_id = %job.item_id, "No tags to write");
            return Ok(());
        }

        let output = Self::tagged_path(&job.media);
        let args = Self::build_args(job, &output);

        if let Err(e) = run_tool(&self.ffmpeg_path, &args, self.watchdog).await {
            let _ = tokio::fs::remove_file(&output).await;
            return Err(e.into());
        }

        tokio::fs::rename(&output, &job.media).await?;
        debug!(item_id = %job.item_id, tags = job.tags.entries().len(), "Tags written");
        Ok(())
    }

    async fn validate(&self) -> Result<(), TagError> {
        check_tool(&self.ffmpeg_path, "-version")
            .await
            .map_err(TagError::ToolUnavailable)
    }
}
