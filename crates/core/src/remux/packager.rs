//! Shaka packager remuxer.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::time::Duration;

use super::config::RemuxMode;
use super::error::RemuxError;
use super::ffmpeg::mux_args;
use super::traits::Remuxer;
use super::types::{ensure_output, RemuxJob, RemuxResult};
use crate::license::LicenseKey;
use crate::media::Container;
use crate::process::{check_tool, run_tool};

/// Decrypts each track with packager, then stream-copies with ffmpeg.
pub struct PackagerRemuxer {
    packager_path: PathBuf,
    ffmpeg_path: PathBuf,
    watchdog: Duration,
}

impl PackagerRemuxer {
    pub fn new(packager_path: PathBuf, ffmpeg_path: PathBuf, watchdog_secs: u64) -> Self {
        Self {
            packager_path,
            ffmpeg_path,
            watchdog: Duration::from_secs(watchdog_secs),
        }
    }

    fn decrypt_args(key: &LicenseKey, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "--quiet".to_string(),
            format!(
                "input={},stream=0,output={}",
                input.to_string_lossy(),
                output.to_string_lossy()
            ),
            "--enable_raw_key_decryption".to_string(),
            "--keys".to_string(),
            format!("key_id={}:key={}", key.key_id(), key.key()),
        ]
    }

    async fn decrypt(
        &self,
        job: &RemuxJob,
        key: &LicenseKey,
        input: &Path,
    ) -> Result<PathBuf, RemuxError> {
        let output = job.intermediate(input, "decrypted");
        run_tool(
            &self.packager_path,
            &Self::decrypt_args(key, input, &output),
            self.watchdog,
        )
        .await?;
        Ok(output)
    }
}

#[async_trait]
impl Remuxer for PackagerRemuxer {
    fn name(&self) -> &str {
        "packager"
    }

    fn accepts_key_for(&self, container: Container) -> bool {
        RemuxMode::Packager.accepts_key_for(container)
    }

    async fn remux(&self, job: RemuxJob) -> Result<RemuxResult, RemuxError> {
        self.check_job(&job)?;
        let start = Instant::now();

        let (audio, video) = match &job.key {
            Some(key) => {
                let audio = self.decrypt(&job, key, &job.audio_input).await?;
                let video = match &job.video_input {
                    Some(input) => Some(self.decrypt(&job, key, input).await?),
                    None => None,
                };
                (audio, video)
            }
            None => (job.audio_input.clone(), job.video_input.clone()),
        };

        let args = mux_args(&audio, video.as_deref(), None, &job.output);
        run_tool(&self.ffmpeg_path, &args, self.watchdog).await?;
        ensure_output(&job.output).await?;

        Ok(RemuxResult {
            decrypted: job.key.is_some(),
            output: job.output,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), RemuxError> {
        check_tool(&self.packager_path, "--version")
            .await
            .map_err(RemuxError::ToolUnavailable)?;
        check_tool(&self.ffmpeg_path, "-version")
            .await
            .map_err(RemuxError::ToolUnavailable)
    }
}
