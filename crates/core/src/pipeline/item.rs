//! The per-item pipeline.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::config::OutputConfig;
use super::error::PipelineError;
use super::state::StateTracker;
use super::types::{ItemReport, PipelineResult, SkipReason};
use super::workspace::ItemWorkspace;
use crate::catalog::Catalog;
use crate::download::{fetch_with_retry, DownloadConfig, DownloadJob, Downloader};
use crate::license::LicenseProvider;
use crate::media::{Container, MediaItem, MediaKind, Metadata, StreamDescriptor};
use crate::metadata::{MetadataResolver, TagConfig, TagError, TagJob, Tagger};
use crate::placer::{FilePlacement, Placer};
use crate::playlist::update_playlist;
use crate::quality::QualityNegotiator;
use crate::remux::{RemuxError, RemuxJob, Remuxer};
use crate::template::{OutputPlan, PathTemplates, PlanOptions};

/// Collaborators of the item pipeline, built once per run.
pub struct PipelineComponents {
    pub catalog: Arc<dyn Catalog>,
    pub negotiator: QualityNegotiator,
    pub license: LicenseProvider,
    pub downloader: Arc<dyn Downloader>,
    pub audio_remuxer: Arc<dyn Remuxer>,
    pub video_remuxer: Arc<dyn Remuxer>,
    pub tagger: Arc<dyn Tagger>,
    pub placer: Arc<dyn Placer>,
}

/// Policy the pipeline runs under.
#[derive(Debug, Clone, Default)]
pub struct PipelineSettings {
    pub output: OutputConfig,
    pub tags: TagConfig,
    pub download: DownloadConfig,
}

/// Drives one leaf item from stream selection to placement.
pub struct ItemPipeline {
    catalog: Arc<dyn Catalog>,
    resolver: MetadataResolver,
    negotiator: QualityNegotiator,
    license: LicenseProvider,
    downloader: Arc<dyn Downloader>,
    audio_remuxer: Arc<dyn Remuxer>,
    video_remuxer: Arc<dyn Remuxer>,
    tagger: Arc<dyn Tagger>,
    placer: Arc<dyn Placer>,
    templates: PathTemplates,
    output: OutputConfig,
    download: DownloadConfig,
}

impl ItemPipeline {
    pub fn new(
        components: PipelineComponents,
        templates: PathTemplates,
        settings: PipelineSettings,
    ) -> Self {
        let resolver = MetadataResolver::new(components.catalog.clone(), settings.tags);
        Self {
            catalog: components.catalog,
            resolver,
            negotiator: components.negotiator,
            license: components.license,
            downloader: components.downloader,
            audio_remuxer: components.audio_remuxer,
            video_remuxer: components.video_remuxer,
            tagger: components.tagger,
            placer: components.placer,
            templates,
            output: settings.output,
            download: settings.download,
        }
    }

    /// Runs `item` to a terminal state.
    pub async fn run(&self, item: MediaItem) -> ItemReport {
        self.run_until(item, std::future::pending::<()>()).await
    }

    /// Runs `item` to a terminal state, aborting when `interrupt` resolves.
    ///
    /// An interrupted item is reported as failed at the stage it was in;
    /// its child processes are killed and its scratch directory purged.
    pub async fn run_until<F>(&self, mut item: MediaItem, interrupt: F) -> ItemReport
    where
        F: Future<Output = ()>,
    {
        let start = Instant::now();
        let item_id = item.id.clone();
        let label = item.display_name();
        let mut tracker = StateTracker::new(&item_id);
        let mut workspace: Option<ItemWorkspace> = None;

        info!(item_id = %item_id, kind = %item.kind, label = %label, "Processing item");

        let outcome = {
            let execution = self.execute(&mut item, &mut tracker, &mut workspace);
            tokio::select! {
                result = execution => result,
                _ = interrupt => Err(PipelineError::Interrupted),
            }
        };

        if let Some(workspace) = workspace.take() {
            workspace.purge().await;
        }

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                let kind = e.kind();
                let stage = tracker.fail(kind);
                warn!(
                    item_id = %item_id,
                    stage = %stage,
                    kind = %kind,
                    error = %e,
                    "Item failed"
                );
                PipelineResult::Failed {
                    stage,
                    kind,
                    message: e.to_string(),
                    diagnostics: e.diagnostics().map(str::to_string),
                }
            }
        };

        debug!(item_id = %item_id, state = %tracker.state(), "Item finished");

        ItemReport {
            item_id,
            label,
            result,
            trace: tracker.into_trace(),
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            output_dir: self.output.output_dir.clone(),
            save_cover: self.output.save_cover,
            save_playlist: self.output.save_playlist,
            synced_lyrics_file: self.resolver.config().synced_lyrics_file,
        }
    }

    async fn execute(
        &self,
        item: &mut MediaItem,
        tracker: &mut StateTracker,
        workspace: &mut Option<ItemWorkspace>,
    ) -> Result<PipelineResult, PipelineError> {
        if self.output.synced_lyrics_only {
            return self.write_synced_lyrics_only(item, tracker).await;
        }

        // QualitySelected
        self.prefer_video_version(item).await?;
        let candidates = self.catalog.stream_candidates(item).await?;
        let negotiated = self.negotiator.negotiate(item, candidates).await?;
        let stream = negotiated.descriptor;
        item.stream = Some(stream.clone());
        info!(item_id = %item.id, stream = %stream.summary(), "Stream selected");
        self.check_key_support(&stream)?;
        tracker.advance();

        // Planned
        let metadata = self.resolver.resolve(item).await?;
        let plan = self.templates.plan(
            &metadata,
            stream.output_extension(),
            stream.is_video(),
            &self.plan_options(),
        );
        debug!(item_id = %item.id, file = %plan.file.display(), "Output planned");

        if !self.output.overwrite && path_exists(&plan.file).await {
            info!(item_id = %item.id, path = %plan.file.display(), "Output exists, skipping");
            let cover = if self.wants_cover_sibling(&plan).await {
                self.resolver.cover(&metadata).await
            } else {
                None
            };
            self.place_siblings(&item.id, &plan, &metadata, cover.as_deref())
                .await?;
            tracker.skip();
            return Ok(PipelineResult::Skipped {
                reason: SkipReason::OutputExists { path: plan.file },
            });
        }
        tracker.advance();

        // Licensed
        let key = self.license.provide(&stream).await?;
        tracker.advance();

        // Downloaded
        let created =
            ItemWorkspace::create(&self.output.temp_dir).map_err(PipelineError::Workspace)?;
        let workspace = workspace.insert(created);
        let (audio_input, video_input) = self.download(item, &stream, workspace).await?;
        tracker.advance();

        // Remuxed
        let media = workspace.path(&format!("media.{}", stream.output_extension()));
        let remuxer = self.remuxer_for(&stream);
        let remuxed = remuxer
            .remux(RemuxJob {
                item_id: item.id.clone(),
                stream: stream.clone(),
                audio_input,
                video_input,
                key,
                work_dir: workspace.dir().to_path_buf(),
                output: media.clone(),
            })
            .await?;
        debug!(item_id = %item.id, remuxer = remuxer.name(), decrypted = remuxed.decrypted, "Remuxed");
        tracker.advance();

        // Tagged
        let tags = self.resolver.tags(&metadata, self.templates.date_tag());
        let embed_cover = tags.embeds_cover() && stream.container == Container::Mp4;
        let cover = if embed_cover || self.wants_cover_sibling(&plan).await {
            self.resolver.cover(&metadata).await
        } else {
            None
        };
        let cover_path = match (&cover, embed_cover) {
            (Some(bytes), true) => {
                let path = workspace.path("cover.jpg");
                tokio::fs::write(&path, bytes).await.map_err(TagError::Io)?;
                Some(path)
            }
            _ => None,
        };
        self.tagger
            .tag(&TagJob {
                item_id: item.id.clone(),
                media: media.clone(),
                container: stream.container,
                is_video: stream.is_video(),
                tags,
                cover: cover_path,
            })
            .await?;
        tracker.advance();

        // Placed
        self.placer
            .place(&FilePlacement {
                item_id: item.id.clone(),
                source: media,
                destination: plan.file.clone(),
                overwrite: self.output.overwrite,
            })
            .await?;
        self.place_siblings(&item.id, &plan, &metadata, cover.as_deref())
            .await?;
        tracker.advance();

        info!(item_id = %item.id, path = %plan.file.display(), "Item placed");
        Ok(PipelineResult::Written {
            path: plan.file,
            downgrades: negotiated.downgrades,
        })
    }

    /// Swaps a song for its music-video version when one exists.
    async fn prefer_video_version(&self, item: &mut MediaItem) -> Result<(), PipelineError> {
        if !self.negotiator.config().prefer_video || item.kind != MediaKind::Song {
            return Ok(());
        }
        if let Some(mut video) = self.catalog.video_version(item).await? {
            info!(item_id = %item.id, video_id = %video.id, "Using music-video version");
            video.playlist = item.playlist.take();
            *item = video;
        }
        Ok(())
    }

    /// Writes only the synced lyrics sibling and skips the media itself.
    async fn write_synced_lyrics_only(
        &self,
        item: &MediaItem,
        tracker: &mut StateTracker,
    ) -> Result<PipelineResult, PipelineError> {
        let metadata = self.resolver.resolve(item).await?;
        let extension = if item.kind.is_video() { "mp4" } else { "m4a" };
        let options = PlanOptions {
            save_cover: false,
            save_playlist: false,
            synced_lyrics_file: true,
            ..self.plan_options()
        };
        let plan = self
            .templates
            .plan(&metadata, extension, item.kind.is_video(), &options);

        if let Some(path) = &plan.synced_lyrics {
            if !self.place_synced_lyrics(&item.id, path, &metadata).await? {
                debug!(item_id = %item.id, "No synced lyrics to write");
            }
        }
        tracker.skip();
        Ok(PipelineResult::Skipped {
            reason: SkipReason::SyncedLyricsOnly,
        })
    }

    fn remuxer_for(&self, stream: &StreamDescriptor) -> &Arc<dyn Remuxer> {
        if stream.is_video() {
            &self.video_remuxer
        } else {
            &self.audio_remuxer
        }
    }

    /// Rejects a keyed stream the configured remuxer cannot decrypt, before
    /// any license request or download is spent on it.
    fn check_key_support(&self, stream: &StreamDescriptor) -> Result<(), PipelineError> {
        let remuxer = self.remuxer_for(stream);
        if stream.is_drm() && self.license.is_enabled() && !remuxer.accepts_key_for(stream.container)
        {
            return Err(RemuxError::IncompatibleRemuxMode {
                mode: remuxer.name().to_string(),
                container: stream.container,
            }
            .into());
        }
        Ok(())
    }

    async fn should_write(&self, path: &Path) -> bool {
        self.output.overwrite || !path_exists(path).await
    }

    async fn wants_cover_sibling(&self, plan: &OutputPlan) -> bool {
        match &plan.cover {
            Some(path) => self.should_write(path).await,
            None => false,
        }
    }

    async fn download(
        &self,
        item: &MediaItem,
        stream: &StreamDescriptor,
        workspace: &ItemWorkspace,
    ) -> Result<(PathBuf, Option<PathBuf>), PipelineError> {
        let extension = stream.container.extension();

        let audio = workspace.path(&format!("audio.{}", extension));
        let job = DownloadJob::new(&item.id, stream.audio.clone(), audio.clone());
        let result = fetch_with_retry(self.downloader.as_ref(), &job, &self.download).await?;
        debug!(item_id = %item.id, bytes = result.bytes, "Audio track downloaded");

        let video = match &stream.video {
            Some(source) => {
                let path = workspace.path(&format!("video.{}", extension));
                let job = DownloadJob::new(&item.id, source.clone(), path.clone());
                let result =
                    fetch_with_retry(self.downloader.as_ref(), &job, &self.download).await?;
                debug!(item_id = %item.id, bytes = result.bytes, "Video track downloaded");
                Some(path)
            }
            None => None,
        };

        Ok((audio, video))
    }

    async fn place_siblings(
        &self,
        item_id: &str,
        plan: &OutputPlan,
        metadata: &Metadata,
        cover: Option<&[u8]>,
    ) -> Result<(), PipelineError> {
        if let (Some(path), Some(bytes)) = (&plan.cover, cover) {
            if self.should_write(path).await {
                self.placer
                    .place_bytes(item_id, bytes, path, self.output.overwrite)
                    .await?;
            }
        }

        if let Some(path) = &plan.synced_lyrics {
            self.place_synced_lyrics(item_id, path, metadata).await?;
        }

        if let (Some(playlist), Some(position)) = (&plan.playlist, metadata.playlist_track) {
            update_playlist(playlist, &plan.file, position).await?;
        }

        Ok(())
    }

    /// Returns whether the item had synced lyrics to write.
    async fn place_synced_lyrics(
        &self,
        item_id: &str,
        path: &Path,
        metadata: &Metadata,
    ) -> Result<bool, PipelineError> {
        let Some(lrc) = metadata.lyrics.to_lrc() else {
            return Ok(false);
        };
        if self.should_write(path).await {
            self.placer
                .place_bytes(item_id, lrc.as_bytes(), path, self.output.overwrite)
                .await?;
        }
        Ok(true)
    }
}

async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
