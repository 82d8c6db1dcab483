use std::path::PathBuf;

use photo_uploader::config::{
    ConfigFile, LoggingSection, RawConfigFile, RcloneSection, UploadSection,
};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from test-friendly values: remote `gphotos:Test`, HEIC/HEIF only,
/// one worker, zero settle delay and zero retry interval.
pub struct ConfigBuilder {
    config: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new(watch_directory: impl Into<PathBuf>) -> Self {
        Self {
            config: RawConfigFile {
                watch_directory: watch_directory.into(),
                supported_extensions: vec![".heic".to_string(), ".heif".to_string()],
                rclone: RcloneSection {
                    remote_name: "gphotos".to_string(),
                    album_name: "Test".to_string(),
                    ..RcloneSection::default()
                },
                logging: LoggingSection::default(),
                upload: UploadSection {
                    concurrent_uploads: 1,
                    wait_time: 0,
                    retry_interval: 0,
                    ..UploadSection::default()
                },
            },
        }
    }

    pub fn extensions(mut self, exts: &[&str]) -> Self {
        self.config.supported_extensions = exts.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn remote(mut self, remote: &str, album: &str) -> Self {
        self.config.rclone.remote_name = remote.to_string();
        self.config.rclone.album_name = album.to_string();
        self
    }

    pub fn binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.config.rclone.binary = binary.into();
        self
    }

    pub fn delete_after_upload(mut self, val: bool) -> Self {
        self.config.rclone.delete_after_upload = val;
        self
    }

    pub fn check_duplicates(mut self, val: bool) -> Self {
        self.config.rclone.check_duplicates = val;
        self
    }

    pub fn concurrent_uploads(mut self, n: usize) -> Self {
        self.config.upload.concurrent_uploads = n;
        self
    }

    pub fn wait_time(mut self, secs: u64) -> Self {
        self.config.upload.wait_time = secs;
        self
    }

    pub fn retry_count(mut self, n: u32) -> Self {
        self.config.upload.retry_count = n;
        self
    }

    pub fn retry_interval(mut self, secs: u64) -> Self {
        self.config.upload.retry_interval = secs;
        self
    }

    pub fn queue_capacity(mut self, n: usize) -> Self {
        self.config.upload.queue_capacity = n;
        self
    }

    pub fn scan_existing(mut self, val: bool) -> Self {
        self.config.upload.scan_existing = val;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
