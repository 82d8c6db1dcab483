// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, UploaderError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = UploaderError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;

        let mut extensions: Vec<String> = raw
            .supported_extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .collect();
        extensions.sort();
        extensions.dedup();

        Ok(ConfigFile::new_unchecked(
            raw.watch_directory,
            extensions,
            raw.rclone,
            raw.logging,
            raw.upload,
        ))
    }
}

/// Lower-case an extension and give it a single leading dot.
///
/// `"HEIC"`, `".heic"` and `" .Heic "` all become `".heic"`.
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.');
    format!(".{}", trimmed.to_lowercase())
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_watch_directory(cfg)?;
    validate_extensions(cfg)?;
    validate_rclone(cfg)?;
    validate_upload(cfg)?;
    Ok(())
}

fn validate_watch_directory(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch_directory.as_os_str().is_empty() {
        return Err(UploaderError::Config(
            "`watch_directory` must be set".to_string(),
        ));
    }
    Ok(())
}

fn validate_extensions(cfg: &RawConfigFile) -> Result<()> {
    if cfg.supported_extensions.is_empty() {
        return Err(UploaderError::Config(
            "`supported_extensions` must list at least one extension".to_string(),
        ));
    }

    for ext in cfg.supported_extensions.iter() {
        if ext.trim().trim_start_matches('.').is_empty() {
            return Err(UploaderError::Config(format!(
                "`supported_extensions` contains an empty extension ({ext:?})"
            )));
        }
    }
    Ok(())
}

fn validate_rclone(cfg: &RawConfigFile) -> Result<()> {
    if cfg.rclone.remote_name.trim().is_empty() {
        return Err(UploaderError::Config(
            "[rclone].remote_name must be set".to_string(),
        ));
    }
    if cfg.rclone.binary.as_os_str().is_empty() {
        return Err(UploaderError::Config(
            "[rclone].binary must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_upload(cfg: &RawConfigFile) -> Result<()> {
    let upload = &cfg.upload;

    if upload.concurrent_uploads == 0 {
        return Err(UploaderError::Config(
            "[upload].concurrent_uploads must be >= 1 (got 0)".to_string(),
        ));
    }
    if upload.retry_count == 0 {
        return Err(UploaderError::Config(
            "[upload].retry_count must be >= 1 (got 0)".to_string(),
        ));
    }
    if upload.queue_capacity == 0 {
        return Err(UploaderError::Config(
            "[upload].queue_capacity must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
