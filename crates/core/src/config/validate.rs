use super::{types::Config, ConfigError};
use crate::license::DrmMode;
use crate::media::Container;
use crate::metadata::TAG_KEYS;
use crate::template::PathTemplates;

/// Validate configuration.
///
/// Runs before any network activity. Templates are compiled here so that a
/// bad field name aborts start-up instead of failing the first item.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    PathTemplates::compile(&config.templates)?;

    if config.output.output_dir.as_os_str().is_empty() {
        return Err(invalid("output.output_dir cannot be empty"));
    }
    if config.output.temp_dir == config.output.output_dir {
        return Err(invalid("output.temp_dir must differ from output.output_dir"));
    }

    if config.drm.mode == DrmMode::Device {
        if config.drm.device_path.as_os_str().is_empty() {
            return Err(invalid("drm.device_path is required when drm.mode = \"device\""));
        }
        if config.drm.license_url.is_empty() {
            return Err(invalid(
                "drm.license_url is required when drm.mode = \"device\" (or set drm.mode = \"disabled\")",
            ));
        }
    }

    if config.drm.mode == DrmMode::Device && config.quality.allow_drm {
        validate_key_support(config)?;
    }

    for (name, secs) in [
        ("drm.timeout_secs", config.drm.timeout_secs),
        ("download.timeout_secs", config.download.timeout_secs),
        ("remux.watchdog_secs", config.remux.watchdog_secs),
        ("catalog.timeout_secs", config.catalog.timeout_secs),
    ] {
        if secs == 0 {
            return Err(invalid(&format!("{} cannot be 0", name)));
        }
    }

    for (name, retry) in [("drm.retry", &config.drm.retry), ("download.retry", &config.download.retry)] {
        if retry.max_attempts == 0 {
            return Err(invalid(&format!("{}.max_attempts cannot be 0", name)));
        }
        if retry.backoff_multiplier < 1.0 {
            return Err(invalid(&format!("{}.backoff_multiplier must be at least 1.0", name)));
        }
    }

    for key in &config.tags.exclude {
        let known = key.eq_ignore_ascii_case("all")
            || key.eq_ignore_ascii_case("cover")
            || TAG_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key));
        if !known {
            return Err(invalid(&format!("tags.exclude: unknown tag '{}'", key)));
        }
    }

    let wait = config.batch.wait_interval_secs;
    if !wait.is_finite() || wait < 0.0 {
        return Err(invalid("batch.wait_interval_secs must be a non-negative number"));
    }

    Ok(())
}

/// Rejects remux modes that can never decrypt the requested containers.
///
/// Vorbis tiers pass: their streams may be DRM-free, and keyed Ogg streams
/// are refused per item before any license request.
fn validate_key_support(config: &Config) -> Result<(), ConfigError> {
    let quality = &config.quality;
    let remux = &config.remux;

    if quality.audio_quality.is_mp4() && !remux.audio_mode.accepts_key_for(Container::Mp4) {
        return Err(invalid(&format!(
            "remux.audio_mode = \"{}\" cannot decrypt {} streams; use ffmpeg, mp4box or packager, or set drm.mode = \"disabled\"",
            remux.audio_mode.as_str(),
            quality.audio_quality.as_str(),
        )));
    }

    if let Some(container) = quality.video_format.container() {
        if !remux.video_mode.accepts_key_for(container) {
            return Err(invalid(&format!(
                "remux.video_mode = \"{}\" cannot decrypt {} video; pick another mode or set drm.mode = \"disabled\"",
                remux.video_mode.as_str(),
                container,
            )));
        }
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{AudioQuality, VideoFormat};
    use crate::remux::RemuxMode;
    use std::path::PathBuf;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.drm.license_url = "https://license.test/acquire".to_string();
        config.output.output_dir = PathBuf::from("/srv/media");
        config.output.temp_dir = PathBuf::from("/tmp/spindle");
        config
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_drm_disabled_needs_no_license_url() {
        let mut config = valid_config();
        config.drm.mode = DrmMode::Disabled;
        config.drm.license_url.clear();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_device_mode_without_license_url_fails() {
        let mut config = valid_config();
        config.drm.license_url.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_unknown_template_field() {
        let mut config = valid_config();
        config.templates.album_folder = "{album_artist}/{albun}".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTemplate(_)));
        assert!(err.to_string().contains("albun"));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = valid_config();
        config.download.timeout_secs = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("download.timeout_secs"));
    }

    #[test]
    fn test_validate_zero_attempts_fails() {
        let mut config = valid_config();
        config.drm.retry.max_attempts = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_same_temp_and_output_dir_fails() {
        let mut config = valid_config();
        config.output.temp_dir = config.output.output_dir.clone();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_tag_excludes() {
        let mut config = valid_config();
        config.tags.exclude = vec!["Lyrics".to_string(), "cover".to_string(), "all".to_string()];
        assert!(validate_config(&config).is_ok());

        config.tags.exclude = vec!["mood".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_negative_wait_interval_fails() {
        let mut config = valid_config();
        config.batch.wait_interval_secs = -1.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_copy_mode_with_drm_fails() {
        let mut config = valid_config();
        config.remux.audio_mode = RemuxMode::Copy;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("remux.audio_mode"));

        config.drm.mode = DrmMode::Disabled;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_copy_mode_without_drm_candidates_passes() {
        let mut config = valid_config();
        config.remux.audio_mode = RemuxMode::Copy;
        config.quality.allow_drm = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_vorbis_tier_with_copy_mode_passes() {
        let mut config = valid_config();
        config.remux.audio_mode = RemuxMode::Copy;
        config.quality.audio_quality = AudioQuality::VorbisHigh;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_webm_video_needs_packager() {
        let mut config = valid_config();
        config.quality.video_format = VideoFormat::Webm;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("remux.video_mode"));

        config.remux.video_mode = RemuxMode::Packager;
        assert!(validate_config(&config).is_ok());
    }
}
