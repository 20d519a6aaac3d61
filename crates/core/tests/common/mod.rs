//! Shared harness for pipeline and batch integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use spindle_core::download::DownloadConfig;
use spindle_core::license::LicenseProvider;
use spindle_core::media::{MediaItem, StreamDescriptor};
use spindle_core::metadata::TagConfig;
use spindle_core::pipeline::OutputConfig;
use spindle_core::placer::{FsPlacer, PlacerConfig};
use spindle_core::quality::{QualityConfig, QualityNegotiator};
use spindle_core::remux::{CopyRemuxer, Remuxer};
use spindle_core::retry::RetryConfig;
use spindle_core::template::{PathTemplates, TemplateConfig};
use spindle_core::testing::fixtures::{song, song_metadata};
use spindle_core::testing::{
    MockCatalog, MockCodecChooser, MockDownloader, MockLicenseService, MockRemuxer, MockTagger,
};
use spindle_core::{ItemPipeline, PipelineComponents, PipelineSettings};

/// Policy knobs the tests vary.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub quality: QualityConfig,
    pub no_drm: bool,
    pub overwrite: bool,
    pub save_cover: bool,
    pub save_playlist: bool,
    pub synced_lyrics_only: bool,
    /// Remux with the real copy backend, which cannot decrypt.
    pub copy_remuxer: bool,
}

/// Mocks for every collaborator plus isolated output and scratch dirs.
pub struct Harness {
    pub catalog: Arc<MockCatalog>,
    pub downloader: Arc<MockDownloader>,
    pub remuxer: Arc<MockRemuxer>,
    pub tagger: Arc<MockTagger>,
    pub license: Arc<MockLicenseService>,
    pub chooser: Arc<MockCodecChooser>,
    output_dir: TempDir,
    temp_dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(MockCatalog::new()),
            downloader: Arc::new(MockDownloader::new()),
            remuxer: Arc::new(MockRemuxer::new()),
            tagger: Arc::new(MockTagger::new()),
            license: Arc::new(MockLicenseService::new()),
            chooser: Arc::new(MockCodecChooser::new()),
            output_dir: TempDir::new().expect("Failed to create output dir"),
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir.path()
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Registers a song on "Album" by "Artist" and returns its item.
    pub async fn add_song(
        &self,
        id: &str,
        title: &str,
        track: u32,
        streams: Vec<StreamDescriptor>,
    ) -> MediaItem {
        self.catalog.set_streams(id, streams).await;
        self.catalog
            .set_metadata(id, song_metadata(id, title, track))
            .await;
        song(id, title)
    }

    pub fn pipeline(&self, options: Options) -> ItemPipeline {
        let license = if options.no_drm {
            LicenseProvider::disabled()
        } else {
            LicenseProvider::new(self.license.clone(), RetryConfig::immediate(3))
        };
        let remuxer: Arc<dyn Remuxer> = if options.copy_remuxer {
            Arc::new(CopyRemuxer::new(PathBuf::from("ffmpeg"), 10))
        } else {
            self.remuxer.clone()
        };
        let negotiator = QualityNegotiator::new(options.quality)
            .with_chooser(self.chooser.clone())
            .with_prefer_drm_free(options.no_drm);

        let components = PipelineComponents {
            catalog: self.catalog.clone(),
            negotiator,
            license,
            downloader: self.downloader.clone(),
            audio_remuxer: remuxer.clone(),
            video_remuxer: remuxer,
            tagger: self.tagger.clone(),
            placer: Arc::new(FsPlacer::new(
                PlacerConfig::default().with_checksum_verification(true),
            )),
        };

        let settings = PipelineSettings {
            output: OutputConfig {
                save_cover: options.save_cover,
                save_playlist: options.save_playlist,
                synced_lyrics_only: options.synced_lyrics_only,
                ..OutputConfig::default()
            }
            .with_dirs(self.output_dir(), self.temp_dir())
            .with_overwrite(options.overwrite),
            tags: TagConfig::default(),
            download: DownloadConfig {
                retry: RetryConfig::immediate(3),
                ..Default::default()
            },
        };

        let templates =
            PathTemplates::compile(&TemplateConfig::default()).expect("Default templates compile");
        ItemPipeline::new(components, templates, settings)
    }

    /// Path a song placed with the default templates ends up at.
    pub fn song_path(&self, track: u32, title: &str, extension: &str) -> PathBuf {
        self.output_dir()
            .join("Artist")
            .join("Album")
            .join(format!("{:02} {}.{}", track, title, extension))
    }

    /// Number of entries left in the scratch root.
    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.temp_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}
