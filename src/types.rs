// src/types.rs

use std::fmt;
use std::path::{Path, PathBuf};

/// A file waiting to be uploaded.
///
/// Nothing beyond the path is tracked. An item is created when a qualifying
/// file is observed and is consumed by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingUpload {
    path: PathBuf,
}

impl PendingUpload {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for PendingUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Retry behaviour for one upload.
///
/// `max_attempts` counts invocations, not retries: `max_attempts = 3` means
/// the sync tool runs at most three times with `interval` between failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: std::time::Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: std::time::Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }
}
