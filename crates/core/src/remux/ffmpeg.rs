//! ffmpeg-based remuxers.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::time::Duration;

use super::config::RemuxMode;
use super::error::RemuxError;
use super::traits::Remuxer;
use super::types::{ensure_output, RemuxJob, RemuxResult};
use crate::media::Container;
use crate::process::{check_tool, run_tool};

/// Builds an ffmpeg stream-copy invocation.
///
/// With `key`, every input is preceded by `-decryption_key` so decryption
/// happens inside the mux.
pub(crate) fn mux_args(
    audio: &Path,
    video: Option<&Path>,
    key: Option<&str>,
    output: &Path,
) -> Vec<String> {
    let mut args: Vec<String> = ["-loglevel", "error", "-hide_banner", "-y"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut add_input = |path: &Path| {
        if let Some(key) = key {
            args.push("-decryption_key".to_string());
            args.push(key.to_string());
        }
        args.push("-i".to_string());
        args.push(path.to_string_lossy().to_string());
    };

    match video {
        Some(video) => {
            add_input(video);
            add_input(audio);
            args.extend(
                ["-c", "copy", "-map", "0:v:0", "-map", "1:a:0"]
                    .iter()
                    .map(|s| s.to_string()),
            );
        }
        None => {
            add_input(audio);
            args.extend(["-c", "copy"].iter().map(|s| s.to_string()));
        }
    }

    args.push(output.to_string_lossy().to_string());
    args
}

/// Stream-copy mux with no decryption support.
pub struct CopyRemuxer {
    ffmpeg_path: PathBuf,
    watchdog: Duration,
}

impl CopyRemuxer {
    pub fn new(ffmpeg_path: PathBuf, watchdog_secs: u64) -> Self {
        Self {
            ffmpeg_path,
            watchdog: Duration::from_secs(watchdog_secs),
        }
    }
}

#[async_trait]
impl Remuxer for CopyRemuxer {
    fn name(&self) -> &str {
        "copy"
    }

    fn accepts_key_for(&self, container: Container) -> bool {
        RemuxMode::Copy.accepts_key_for(container)
    }

    async fn remux(&self, job: RemuxJob) -> Result<RemuxResult, RemuxError> {
        self.check_job(&job)?;
        let start = Instant::now();
        let args = mux_args(&job.audio_input, job.video_input.as_deref(), None, &job.output);
        run_tool(&self.ffmpeg_path, &args, self.watchdog).await?;
        ensure_output(&job.output).await?;
        Ok(RemuxResult {
            output: job.output,
            decrypted: false,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), RemuxError> {
        check_tool(&self.ffmpeg_path, "-version")
            .await
            .map_err(RemuxError::ToolUnavailable)
    }
}

/// Stream-copy mux with inline decryption of mp4 inputs.
pub struct FfmpegRemuxer {
    ffmpeg_path: PathBuf,
    watchdog: Duration,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: PathBuf, watchdog_secs: u64) -> Self {
        Self {
            ffmpeg_path,
            watchdog: Duration::from_secs(watchdog_secs),
        }
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn accepts_key_for(&self, container: Container) -> bool {
        RemuxMode::Ffmpeg.accepts_key_for(container)
    }

    async fn remux(&self, job: RemuxJob) -> Result<RemuxResult, RemuxError> {
        self.check_job(&job)?;
        let start = Instant::now();
        let key = job.key.as_ref().map(|k| k.key());
        let args = mux_args(&job.audio_input, job.video_input.as_deref(), key, &job.output);

        tracing::debug!(item_id = %job.item_id, decrypt = key.is_some(), "Remuxing with ffmpeg");
        run_tool(&self.ffmpeg_path, &args, self.watchdog).await?;
        ensure_output(&job.output).await?;

        Ok(RemuxResult {
            output: job.output.clone(),
            decrypted: key.is_some(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), RemuxError> {
        check_tool(&self.ffmpeg_path, "-version")
            .await
            .map_err(RemuxError::ToolUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::LicenseKey;
    use crate::media::AudioQuality;
    use crate::testing::fixtures::{audio_stream, drm_protected};

    #[test]
    fn test_audio_args_without_key() {
        let args = mux_args(Path::new("/w/a.mp4"), None, None, Path::new("/w/out.m4a"));
        assert_eq!(
            args,
            vec![
                "-loglevel", "error", "-hide_banner", "-y", "-i", "/w/a.mp4", "-c", "copy",
                "/w/out.m4a"
            ]
        );
    }

    #[test]
    fn test_video_args_with_key() {
        let args = mux_args(
            Path::new("/w/a.mp4"),
            Some(Path::new("/w/v.mp4")),
            Some("abcd"),
            Path::new("/w/out.mp4"),
        );
        assert_eq!(
            args,
            vec![
                "-loglevel",
                "error",
                "-hide_banner",
                "-y",
                "-decryption_key",
                "abcd",
                "-i",
                "/w/v.mp4",
                "-decryption_key",
                "abcd",
                "-i",
                "/w/a.mp4",
                "-c",
                "copy",
                "-map",
                "0:v:0",
                "-map",
                "1:a:0",
                "/w/out.mp4"
            ]
        );
    }

    #[tokio::test]
    async fn test_copy_mode_rejects_key() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("a.mp4");
        std::fs::write(&input, b"data").unwrap();

        let stream = drm_protected(audio_stream("s", AudioQuality::AacMedium, 128));
        let job = RemuxJob {
            item_id: "item".to_string(),
            stream,
            audio_input: input,
            video_input: None,
            key: Some(LicenseKey::new("s", "kid", "key")),
            work_dir: temp.path().to_path_buf(),
            output: temp.path().join("out.m4a"),
        };

        let remuxer = CopyRemuxer::new(PathBuf::from("/nonexistent/ffmpeg"), 10);
        let err = remuxer.remux(job).await.unwrap_err();
        assert!(matches!(err, RemuxError::IncompatibleRemuxMode { .. }));
    }

    #[tokio::test]
    async fn test_key_for_other_stream_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("a.mp4");
        std::fs::write(&input, b"data").unwrap();

        let job = RemuxJob {
            item_id: "item".to_string(),
            stream: drm_protected(audio_stream("s", AudioQuality::AacMedium, 128)),
            audio_input: input,
            video_input: None,
            key: Some(LicenseKey::new("other", "kid", "key")),
            work_dir: temp.path().to_path_buf(),
            output: temp.path().join("out.m4a"),
        };

        let remuxer = FfmpegRemuxer::new(PathBuf::from("/nonexistent/ffmpeg"), 10);
        let err = remuxer.remux(job).await.unwrap_err();
        assert!(matches!(err, RemuxError::KeyMismatch { .. }));
    }

    #[tokio::test]
    async fn test_missing_tool_is_remux_failed() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("a.mp4");
        std::fs::write(&input, b"data").unwrap();

        let job = RemuxJob {
            item_id: "item".to_string(),
            stream: audio_stream("s", AudioQuality::AacMedium, 128),
            audio_input: input,
            video_input: None,
            key: None,
            work_dir: temp.path().to_path_buf(),
            output: temp.path().join("out.m4a"),
        };

        let remuxer = FfmpegRemuxer::new(PathBuf::from("/nonexistent/ffmpeg"), 10);
        let err = remuxer.remux(job).await.unwrap_err();
        assert!(matches!(err, RemuxError::RemuxFailed { .. }));
    }

    #[tokio::test]
    async fn test_missing_input_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let job = RemuxJob {
            item_id: "item".to_string(),
            stream: audio_stream("s", AudioQuality::AacMedium, 128),
            audio_input: temp.path().join("missing.mp4"),
            video_input: None,
            key: None,
            work_dir: temp.path().to_path_buf(),
            output: temp.path().join("out.m4a"),
        };

        let err = CopyRemuxer::new(PathBuf::from("ffmpeg"), 10)
            .remux(job)
            .await
            .unwrap_err();
        assert!(matches!(err, RemuxError::InputNotFound { .. }));
    }
}
