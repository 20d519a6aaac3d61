//! Built-in HTTP downloader.

use async_trait::async_trait;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use super::error::DownloadError;
use super::traits::Downloader;
use super::types::{DownloadJob, DownloadResult};

/// Streams every URL of a track into the destination with reqwest.
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new(timeout_secs: u64) -> Result<Self, DownloadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| DownloadError::Network {
                url: String::new(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    /// Appends the body of `url` to `writer`, returning the byte count.
    async fn fetch_url(
        &self,
        url: &str,
        writer: &mut BufWriter<File>,
    ) -> Result<u64, DownloadError> {
        let network = |e: reqwest::Error| DownloadError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let expected = response.content_length();
        let mut received = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(network)?;
            writer.write_all(&chunk).await?;
            received += chunk.len() as u64;
        }

        check_length(url, expected, received)?;
        Ok(received)
    }
}

/// Fails if the server announced more (or fewer) bytes than arrived.
fn check_length(url: &str, expected: Option<u64>, received: u64) -> Result<(), DownloadError> {
    match expected {
        Some(expected) if expected != received => Err(DownloadError::Truncated {
            url: url.to_string(),
            expected,
            received,
        }),
        _ => Ok(()),
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    fn name(&self) -> &str {
        "builtin"
    }

    async fn fetch(&self, job: &DownloadJob) -> Result<DownloadResult, DownloadError> {
        let urls = job.source.urls();
        if urls.is_empty() {
            return Err(DownloadError::InvalidSource {
                reason: "track has no URLs".to_string(),
            });
        }

        let start = Instant::now();
        let file = File::create(&job.destination).await?;
        let mut writer = BufWriter::new(file);
        let mut bytes = 0u64;

        for url in urls {
            bytes += self.fetch_url(url, &mut writer).await?;
        }
        writer.flush().await?;

        tracing::debug!(
            item_id = %job.item_id,
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
        Ok(())
    }
}
