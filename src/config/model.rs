// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// watch_directory = "/srv/photos/inbox"
/// supported_extensions = [".heic", ".heif"]
///
/// [rclone]
/// remote_name = "gphotos"
/// album_name = "Inbox"
/// delete_after_upload = false
/// check_duplicates = true
///
/// [logging]
/// level = "info"
///
/// [upload]
/// concurrent_uploads = 2
/// wait_time = 2
/// retry_count = 3
/// retry_interval = 5
/// ```
///
/// Only `watch_directory` and `rclone.remote_name` are mandatory; everything
/// else falls back to the defaults below. This is the unvalidated form, see
/// [`ConfigFile`] for the checked snapshot the rest of the crate consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Directory to watch (non-recursively) for new files.
    #[serde(default)]
    pub watch_directory: PathBuf,

    /// Extensions that qualify a file for upload, compared case-insensitively.
    ///
    /// The leading dot is optional: `"heic"` and `".HEIC"` are equivalent.
    #[serde(default = "default_supported_extensions")]
    pub supported_extensions: Vec<String>,

    #[serde(default)]
    pub rclone: RcloneSection,

    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub upload: UploadSection,
}

/// Validated configuration snapshot.
///
/// Built through `ConfigFile::try_from(RawConfigFile)`, which checks the
/// invariants documented in `validate.rs` and normalises
/// `supported_extensions` to lower-case with a leading dot.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch_directory: PathBuf,
    pub supported_extensions: Vec<String>,
    pub rclone: RcloneSection,
    pub logging: LoggingSection,
    pub upload: UploadSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        watch_directory: PathBuf,
        supported_extensions: Vec<String>,
        rclone: RcloneSection,
        logging: LoggingSection,
        upload: UploadSection,
    ) -> Self {
        Self {
            watch_directory,
            supported_extensions,
            rclone,
            logging,
            upload,
        }
    }

    /// `<remote>:<album>` destination passed to the sync tool.
    pub fn remote_destination(&self) -> String {
        format!("{}:{}", self.rclone.remote_name, self.rclone.album_name)
    }
}

/// `[rclone]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RcloneSection {
    /// Name of the remote as configured in rclone (e.g. `gphotos`).
    #[serde(default)]
    pub remote_name: String,

    /// Album on the remote. May be empty, in which case the destination is
    /// just `<remote>:`.
    #[serde(default)]
    pub album_name: String,

    /// Remove the local file once the upload succeeded.
    #[serde(default)]
    pub delete_after_upload: bool,

    /// Pass `--checksum` so the tool skips files already present remotely.
    #[serde(default)]
    pub check_duplicates: bool,

    /// Executable to invoke; looked up on `PATH` when not absolute.
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
}

fn default_binary() -> PathBuf {
    PathBuf::from("rclone")
}

impl Default for RcloneSection {
    fn default() -> Self {
        Self {
            remote_name: String::new(),
            album_name: String::new(),
            delete_after_upload: false,
            check_duplicates: false,
            binary: default_binary(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// One of `panic`, `fatal`, `error`, `warn`, `info`, `debug`, `trace`.
    /// Anything else logs at `info`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to this file instead of stderr.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// When non-zero, rotate the log file daily and keep this many files.
    #[serde(default)]
    pub max_backups: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: None,
            max_backups: 0,
        }
    }
}

/// `[upload]` section. Durations are whole seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSection {
    /// Number of worker tasks.
    #[serde(default = "default_concurrent_uploads")]
    pub concurrent_uploads: usize,

    /// Settle delay between detecting a file and queueing it.
    #[serde(default = "default_wait_time")]
    pub wait_time: u64,

    /// Maximum number of invocations of the sync tool per file.
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Pause between two failed invocations.
    #[serde(default = "default_retry_interval")]
    pub retry_interval: u64,

    /// Capacity of the pending-upload queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Queue files already present in the watch directory at startup.
    #[serde(default)]
    pub scan_existing: bool,
}

fn default_concurrent_uploads() -> usize {
    2
}

fn default_wait_time() -> u64 {
    2
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_interval() -> u64 {
    5
}

fn default_queue_capacity() -> usize {
    100
}

impl Default for UploadSection {
    fn default() -> Self {
        Self {
            concurrent_uploads: default_concurrent_uploads(),
            wait_time: default_wait_time(),
            retry_count: default_retry_count(),
            retry_interval: default_retry_interval(),
            queue_capacity: default_queue_capacity(),
            scan_existing: false,
        }
    }
}

impl UploadSection {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.wait_time)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_interval)
    }
}

fn default_supported_extensions() -> Vec<String> {
    vec![".heic".to_string(), ".heif".to_string()]
}
