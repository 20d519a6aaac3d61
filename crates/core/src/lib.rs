pub mod batch;
pub mod catalog;
pub mod config;
pub mod download;
pub mod license;
pub mod media;
pub mod metadata;
pub mod pipeline;
pub mod placer;
pub mod playlist;
pub mod process;
pub mod quality;
pub mod remux;
pub mod retry;
pub mod template;
pub mod testing;

pub use batch::{BatchConfig, BatchOrchestrator, BatchReport};
pub use catalog::{create_catalog, Catalog, CatalogError};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LogFormat,
    LoggingConfig, SanitizedConfig,
};
pub use media::{MediaItem, MediaKind, Metadata, StreamDescriptor};
pub use pipeline::{
    ErrorKind, ItemPipeline, ItemReport, ItemState, PipelineComponents, PipelineError,
    PipelineResult, PipelineSettings, Stage,
};
