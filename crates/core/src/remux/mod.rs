//! Decrypt/remux backends.
//!
//! A [`Remuxer`] turns the downloaded track files of one item into a single
//! untagged media file in the item's scratch directory, decrypting on the
//! way when a [`LicenseKey`](crate::license::LicenseKey) is supplied.
//! Backends that cannot consume keys refuse keyed jobs up front with
//! [`RemuxError::IncompatibleRemuxMode`].

mod config;
mod error;
mod ffmpeg;
mod mp4box;
mod packager;
mod traits;
mod types;

pub use config::{RemuxConfig, RemuxMode};
pub use error::RemuxError;
pub use ffmpeg::{CopyRemuxer, FfmpegRemuxer};
pub use mp4box::Mp4BoxRemuxer;
pub use packager::PackagerRemuxer;
pub use traits::Remuxer;
pub use types::{RemuxJob, RemuxResult};

/// Creates the remuxer for `mode`.
pub fn create_remuxer(mode: RemuxMode, config: &RemuxConfig) -> Box<dyn Remuxer> {
    let watchdog = config.watchdog_secs;
    match mode {
        RemuxMode::Copy => Box::new(CopyRemuxer::new(config.ffmpeg_path.clone(), watchdog)),
        RemuxMode::Ffmpeg => Box::new(FfmpegRemuxer::new(config.ffmpeg_path.clone(), watchdog)),
        RemuxMode::Mp4box => Box::new(Mp4BoxRemuxer::new(
            config.mp4decrypt_path.clone(),
            config.mp4box_path.clone(),
            watchdog,
        )),
        RemuxMode::Packager => Box::new(PackagerRemuxer::new(
            config.packager_path.clone(),
            config.ffmpeg_path.clone(),
            watchdog,
        )),
    }
}
