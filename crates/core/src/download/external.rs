//! Downloaders backed by external fetch tools.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::time::Duration;

use super::error::DownloadError;
use super::traits::Downloader;
use super::types::{DownloadJob, DownloadResult};
use crate::process::{check_tool, run_tool};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tool {
    Aria2c,
    Curl,
}

/// Runs aria2c or curl once per URL.
pub struct ToolDownloader {
    tool: Tool,
    path: PathBuf,
    timeout: Duration,
}

impl ToolDownloader {
    pub fn aria2c(path: PathBuf, timeout_secs: u64) -> Self {
        Self {
            tool: Tool::Aria2c,
            path,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn curl(path: PathBuf, timeout_secs: u64) -> Self {
        Self {
            tool: Tool::Curl,
            path,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Arguments fetching `url` into `output`.
    fn args(&self, url: &str, output: &Path) -> Vec<String> {
        match self.tool {
            Tool::Aria2c => {
                let dir = output
                    .parent()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|| ".".to_string());
                let name = output
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                vec![
                    "--no-conf".to_string(),
                    "--download-result=hide".to_string(),
                    "--console-log-level=error".to_string(),
                    "--summary-interval=0".to_string(),
                    "--file-allocation=none".to_string(),
                    "--allow-overwrite=true".to_string(),
                    "--auto-file-renaming=false".to_string(),
                    url.to_string(),
                    "--dir".to_string(),
                    dir,
                    "--out".to_string(),
                    name,
                ]
            }
            Tool::Curl => vec![
                "-sSL".to_string(),
                "--fail".to_string(),
                "-o".to_string(),
                output.to_string_lossy().to_string(),
                url.to_string(),
            ],
        }
    }

    async fn fetch_url(&self, url: &str, output: &Path) -> Result<u64, DownloadError> {
        run_tool(&self.path, &self.args(url, output), self.timeout).await?;
        let metadata = fs::metadata(output).await.map_err(|_| DownloadError::Truncated {
            url: url.to_string(),
            expected: 1,
            received: 0,
        })?;
        Ok(metadata.len())
    }
}

fn segment_path(destination: &Path, index: usize) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".part{}", index));
    destination.with_file_name(name)
}

#[async_trait]
impl Downloader for ToolDownloader {
    fn name(&self) -> &str {
        match self.tool {
            Tool::Aria2c => "aria2c",
            Tool::Curl => "curl",
        }
    }

    async fn fetch(&self, job: &DownloadJob) -> Result<DownloadResult, DownloadError> {
        let urls = job.source.urls();
        if urls.is_empty() {
            return Err(DownloadError::InvalidSource {
                reason: "track has no URLs".to_string(),
            });
        }

        let start = Instant::now();

        if urls.len() == 1 {
            let bytes = self.fetch_url(&urls[0], &job.destination).await?;
            return Ok(DownloadResult {
                path: job.destination.clone(),
                bytes,
                segments: 1,
                duration_ms: start.elapsed().as_millis() as u64,
            });
        }

        File::create(&job.destination).await?;
        let mut output = OpenOptions::new().append(true).open(&job.destination).await?;
        let mut bytes = 0u64;

        for (index, url) in urls.iter().enumerate() {
            let part = segment_path(&job.destination, index);
            bytes += self.fetch_url(url, &part).await?;
            let data = fs::read(&part).await?;
            output.write_all(&data).await?;
            fs::remove_file(&part).await?;
        }
        output.flush().await?;

        tracing::debug!(
            item_id = %job.item_id,
            tool = self.name(),
            bytes,
            segments = urls.len(),
            "Download complete"
        );

        Ok(DownloadResult {
            path: job.destination.clone(),
            bytes,
            segments: urls.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), DownloadError> {
        check_tool(&self.path, "--version").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curl_args() {
        let downloader = ToolDownloader::curl(PathBuf::from("curl"), 60);
        let args = downloader.args("https://cdn.test/a", Path::new("/tmp/x/audio.mp4"));
        assert_eq!(
            args,
            vec!["-sSL", "--fail", "-o", "/tmp/x/audio.mp4", "https://cdn.test/a"]
        );
    }

    #[test]
    fn test_aria2c_args_split_dir_and_name() {
        let downloader = ToolDownloader::aria2c(PathBuf::from("aria2c"), 60);
        let args = downloader.args("https://cdn.test/a", Path::new("/tmp/x/audio.mp4"));
        assert_eq!(args[0], "--no-conf");
        let dir = args.iter().position(|a| a == "--dir").unwrap();
        assert_eq!(args[dir + 1], "/tmp/x");
        let out = args.iter().position(|a| a == "--out").unwrap();
        assert_eq!(args[out + 1], "audio.mp4");
    }

    #[test]
    fn test_segment_path() {
        assert_eq!(
            segment_path(Path::new("/tmp/x/video.mp4"), 2),
            PathBuf::from("/tmp/x/video.mp4.part2")
        );
    }

    #[tokio::test]
    async fn test_missing_tool_fails_validation() {
        let downloader = ToolDownloader::curl(PathBuf::from("/nonexistent/curl"), 60);
        let err = downloader.validate().await.unwrap_err();
        assert!(matches!(err, DownloadError::Tool(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_segments_appended_with_file_urls() {
        let temp = tempfile::tempdir().unwrap();
        let a = temp.path().join("a.bin");
        let b = temp.path().join("b.bin");
        std::fs::write(&a, b"AA").unwrap();
        std::fs::write(&b, b"BB").unwrap();

        let downloader = ToolDownloader::curl(PathBuf::from("curl"), 60);
        if downloader.validate().await.is_err() {
            return;
        }

        let job = DownloadJob::new(
            "item",
            crate::media::TrackSource::Segments {
                urls: vec![
                    format!("file://{}", a.display()),
                    format!("file://{}", b.display()),
                ],
            },
            temp.path().join("out.mp4"),
        );
        let result = downloader.fetch(&job).await.unwrap();
        assert_eq!(result.bytes, 4);
        assert_eq!(std::fs::read(&job.destination).unwrap(), b"AABB");
        assert!(!segment_path(&job.destination, 0).exists());
    }
}
