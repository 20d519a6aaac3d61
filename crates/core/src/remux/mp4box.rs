//! mp4decrypt + MP4Box remuxer.

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

/// Decrypts each track with mp4decrypt, then muxes with MP4Box.
pub struct Mp4BoxRemuxer {
    mp4decrypt_path: PathBuf,
    mp4box_path: PathBuf,
    watchdog: Duration,
}

impl Mp4BoxRemuxer {
    pub fn new(mp4decrypt_path: PathBuf, mp4box_path: PathBuf, watchdog_secs: u64) -> Self {
        Self {
            mp4decrypt_path,
            mp4box_path,
            watchdog: Duration::from_secs(watchdog_secs),
        }
    }

    fn decrypt_args(key: &str, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "--key".to_string(),
            format!("1:{}", key),
            input.to_string_lossy().to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    fn mux_args(audio: &Path, video: Option<&Path>, output: &Path) -> Vec<String> {
        let mut args = vec![
            "-quiet".to_string(),
            "-itags".to_string(),
            "title=".to_string(),
            "-keep-utc".to_string(),
        ];
        if let Some(video) = video {
            args.push("-add".to_string());
            args.push(video.to_string_lossy().to_string());
        }
        args.push("-add".to_string());
        args.push(audio.to_string_lossy().to_string());
        args.push("-new".to_string());
        args.push(output.to_string_lossy().to_string());
        args
    }
}

#[async_trait]
impl Remuxer for Mp4BoxRemuxer {
    fn name(&self) -> &str {
        "mp4box"
    }

    fn accepts_key_for(&self, container: Container) -> bool {
        RemuxMode::Mp4box.accepts_key_for(container)
    }

    async fn remux(&self, job: RemuxJob) -> Result<RemuxResult, RemuxError> {
        self.check_job(&job)?;
        let start = Instant::now();

        let (audio, video) = match &job.key {
            Some(key) => {
                let audio = job.intermediate(&job.audio_input, "decrypted");
                run_tool(
                    &self.mp4decrypt_path,
                    &Self::decrypt_args(key.key(), &job.audio_input, &audio),
                    self.watchdog,
                )
                .await?;

                let video = match &job.video_input {
                    Some(input) => {
                        let out = job.intermediate(input, "decrypted");
                        run_tool(
                            &self.mp4decrypt_path,
                            &Self::decrypt_args(key.key(), input, &out),
                            self.watchdog,
                        )
                        .await?;
                        Some(out)
                    }
                    None => None,
                };
                (audio, video)
            }
            None => (job.audio_input.clone(), job.video_input.clone()),
        };

        tracing::debug!(item_id = %job.item_id, "Muxing with MP4Box");
        let args = Self::mux_args(&audio, video.as_deref(), &job.output);
        run_tool(&self.mp4box_path, &args, self.watchdog).await?;
        ensure_output(&job.output).await?;

        Ok(RemuxResult {
            decrypted: job.key.is_some(),
            output: job.output,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), RemuxError> {
        check_tool(&self.mp4decrypt_path, "--version")
            .await
            .map_err(RemuxError::ToolUnavailable)?;
        check_tool(&self.mp4box_path, "-version")
            .await
            .map_err(RemuxError::ToolUnavailable)
    }
}
