//! Download backends.
//!
//! Every backend implements [`Downloader`]: fetch the URLs of one track into
//! a file under the item's scratch directory, byte for byte. Segmented
//! tracks are fetched in order and appended. [`create_downloader`] is the
//! only place that maps the configured backend name to an implementation.

mod config;
mod error;
mod external;
mod http;
mod traits;
mod types;

pub use config::{DownloadBackend, DownloadConfig};
pub use error::DownloadError;
pub use external::ToolDownloader;
pub use http::HttpDownloader;
pub use traits::Downloader;
pub use types::{DownloadJob, DownloadResult};

use crate::retry::with_retry;

/// Creates the downloader selected by `config`.
pub fn create_downloader(config: &DownloadConfig) -> Result<Box<dyn Downloader>, DownloadError> {
    match config.backend {
        DownloadBackend::Builtin => Ok(Box::new(HttpDownloader::new(config.timeout_secs)?)),
        DownloadBackend::Aria2c => Ok(Box::new(ToolDownloader::aria2c(
            config.aria2c_path.clone(),
            config.timeout_secs,
        ))),
        DownloadBackend::Curl => Ok(Box::new(ToolDownloader::curl(
            config.curl_path.clone(),
            config.timeout_secs,
        ))),
    }
}

/// Runs `job` on `downloader`, restarting the track on transient failures.
pub async fn fetch_with_retry(
    downloader: &dyn Downloader,
    job: &DownloadJob,
    config: &DownloadConfig,
) -> Result<DownloadResult, DownloadError> {
    with_retry(&config.retry, "download", || downloader.fetch(job)).await
}
