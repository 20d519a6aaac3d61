//! spindle - streaming catalog media acquisition.

mod chooser;
mod cli;
mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use spindle_core::catalog::Catalog;
use spindle_core::download::{create_downloader, Downloader};
use spindle_core::license::{create_license_provider, DrmMode};
use spindle_core::metadata::{FfmpegTagger, Tagger};
use spindle_core::placer::{FsPlacer, Placer, PlacerConfig};
use spindle_core::quality::QualityNegotiator;
use spindle_core::remux::{create_remuxer, Remuxer};
use spindle_core::template::PathTemplates;
use spindle_core::{
    create_catalog, load_config, validate_config, BatchOrchestrator, BatchReport, Config,
    ItemPipeline, MediaItem, PipelineComponents, PipelineSettings, SanitizedConfig,
};

use chooser::StdinChooser;
use cli::Cli;

/// Config file picked up from the working directory when none is given.
const DEFAULT_CONFIG_FILE: &str = "spindle.toml";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var_os("SPINDLE_CONFIG").map(PathBuf::from))
        .or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        });

    let mut config = load_config(config_path.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    cli.apply(&mut config);

    logging::init(&config.logging)?;

    validate_config(&config).context("Configuration validation failed")?;
    info!(config = ?config_path, "Configuration loaded");
    debug!(effective = ?SanitizedConfig::from(&config), "Effective configuration");

    let templates = PathTemplates::compile(&config.templates).context("Invalid template")?;
    let catalog = create_catalog(&config.catalog)
        .await
        .context("Failed to open catalog")?;
    let components = build_components(&config, catalog.clone()).await?;

    let urls = collect_urls(&cli.urls, cli.read_urls_as_txt).await?;
    let mut unresolved = BatchReport::default();
    let mut items: Vec<MediaItem> = Vec::new();
    for url in urls {
        match catalog.resolve(&url).await {
            Ok(item) => {
                debug!(url = %url, id = %item.id, kind = %item.kind, "Resolved URL");
                items.extend(item.leaves());
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to resolve URL");
                unresolved.record_unresolved(url, e);
            }
        }
    }

    let settings = PipelineSettings {
        output: config.output.clone(),
        tags: config.tags.clone(),
        download: config.download.clone(),
    };
    let pipeline = ItemPipeline::new(components, templates, settings);
    let orchestrator = BatchOrchestrator::new(pipeline, config.batch.clone());

    let shutdown = orchestrator.shutdown_handle();
    tokio::spawn(forward_shutdown(shutdown));

    let mut report = orchestrator.run(items).await;
    report.merge(unresolved);
    report.log_summary();

    Ok(report.exit_code())
}

/// Builds every stage backend and checks the external tools they need.
async fn build_components(
    config: &Config,
    catalog: Arc<dyn Catalog>,
) -> Result<PipelineComponents> {
    let downloader: Arc<dyn Downloader> = Arc::from(
        create_downloader(&config.download).context("Failed to create downloader")?,
    );
    let audio_remuxer: Arc<dyn Remuxer> =
        Arc::from(create_remuxer(config.remux.audio_mode, &config.remux));
    let video_remuxer: Arc<dyn Remuxer> =
        Arc::from(create_remuxer(config.remux.video_mode, &config.remux));
    let tagger: Arc<dyn Tagger> = Arc::new(FfmpegTagger::new(
        config.remux.ffmpeg_path.clone(),
        config.remux.watchdog_secs,
    ));
    let placer: Arc<dyn Placer> = Arc::new(FsPlacer::new(
        PlacerConfig::default().with_checksum_verification(config.output.verify_checksum),
    ));

    downloader
        .validate()
        .await
        .context("Download backend unavailable")?;
    audio_remuxer
        .validate()
        .await
        .context("Audio remux backend unavailable")?;
    video_remuxer
        .validate()
        .await
        .context("Video remux backend unavailable")?;
    tagger.validate().await.context("Tagger unavailable")?;

    let license =
        create_license_provider(&config.drm).context("Failed to set up license provider")?;
    let negotiator = QualityNegotiator::new(config.quality.clone())
        .with_chooser(Arc::new(StdinChooser))
        .with_prefer_drm_free(config.drm.mode == DrmMode::Disabled);

    info!(
        catalog = catalog.name(),
        downloader = downloader.name(),
        audio_remuxer = audio_remuxer.name(),
        video_remuxer = video_remuxer.name(),
        drm = license.is_enabled(),
        "Backends ready"
    );

    Ok(PipelineComponents {
        catalog,
        negotiator,
        license,
        downloader,
        audio_remuxer,
        video_remuxer,
        tagger,
        placer,
    })
}

/// Expands the positional arguments into URLs.
async fn collect_urls(args: &[String], from_files: bool) -> Result<Vec<String>> {
    if !from_files {
        return Ok(args.to_vec());
    }

    let mut urls = Vec::new();
    for path in args {
        let contents = tokio::fs::read_to_string(Path::new(path))
            .await
            .with_context(|| format!("Failed to read URL file {:?}", path))?;
        urls.extend(parse_url_list(&contents));
    }
    Ok(urls)
}

/// One URL per line; blank lines and `#` comments are ignored.
fn parse_url_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Sends on `shutdown` at the first Ctrl+C or SIGTERM.
async fn forward_shutdown(shutdown: broadcast::Sender<()>) {
    shutdown_signal().await;
    warn!("Interrupt received, aborting current item");
    let _ = shutdown.send(());
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
