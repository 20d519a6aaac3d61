//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use spindle_core::license::DrmMode;
use spindle_core::media::CoverSize;
use spindle_core::Config;

#[derive(Debug, Parser)]
#[command(name = "spindle")]
#[command(about = "Download, decrypt, tag and file media from a streaming catalog")]
#[command(version)]
pub struct Cli {
    /// Catalog URLs, or text files of URLs with --read-urls-as-txt
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Catalog snapshot to resolve URLs against
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Treat each argument as a text file with one URL per line
    #[arg(short, long)]
    pub read_urls_as_txt: bool,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Scratch directory
    #[arg(short, long)]
    pub temp: Option<PathBuf>,

    /// Never acquire licenses; DRM-only items fail
    #[arg(long)]
    pub no_drm: bool,

    /// Replace files that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Cover art size: small, medium, large or extra-large
    #[arg(long)]
    pub cover_size: Option<CoverSize>,

    /// Download a song's music video instead when the catalog has one
    #[arg(long)]
    pub prefer_video: bool,

    /// Only write synced lyrics files, skip the media
    #[arg(long)]
    pub synced_lyrics_only: bool,

    /// Seconds between the start of consecutive items
    #[arg(long)]
    pub wait_interval: Option<f64>,

    /// Log filter, e.g. "debug" or "spindle_core=trace"
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Stop at the first failed item
    #[arg(long)]
    pub stop_on_error: bool,

    /// Write an aggregate .m3u8 of the placed files
    #[arg(long)]
    pub playlist: Option<PathBuf>,
}

impl Cli {
    /// Applies flag overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(catalog) = &self.catalog {
            config.catalog.snapshot = catalog.clone();
        }
        if let Some(output) = &self.output {
            config.output.output_dir = output.clone();
        }
        if let Some(temp) = &self.temp {
            config.output.temp_dir = temp.clone();
        }
        if self.no_drm {
            config.drm.mode = DrmMode::Disabled;
        }
        if self.overwrite {
            config.output.overwrite = true;
        }
        if let Some(size) = self.cover_size {
            config.tags.cover_size = size;
        }
        if self.prefer_video {
            config.quality.prefer_video = true;
        }
        if self.synced_lyrics_only {
            config.output.synced_lyrics_only = true;
        }
        if let Some(secs) = self.wait_interval {
            config.batch.wait_interval_secs = secs;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        if self.stop_on_error {
            config.batch.continue_on_error = false;
        }
        if let Some(playlist) = &self.playlist {
            config.batch.playlist_path = Some(playlist.clone());
        }
    }
}
