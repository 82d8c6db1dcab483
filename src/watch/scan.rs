// src/watch/scan.rs

//! One-off startup scan of files already sitting in the watch directory.

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::queue::{EnqueueOutcome, QueueProducer};
use crate::errors::Result;
use crate::types::PendingUpload;
use crate::watch::filter::ExtensionFilter;

/// List regular files directly inside `dir` that pass `filter`, sorted by
/// path.
pub async fn existing_files(dir: &Path, filter: &ExtensionFilter) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() || !filter.matches(&path) {
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Queue every qualifying file already present in `dir`.
///
/// No settle delay is applied; these files were complete before startup.
/// Returns how many were queued. Stops early if the token fires or the
/// queue closes.
pub async fn enqueue_existing(
    dir: &Path,
    filter: &ExtensionFilter,
    producer: &QueueProducer,
    cancel: &CancellationToken,
) -> Result<usize> {
    let files = existing_files(dir, filter).await?;
    let mut queued = 0;

    for path in files {
        match producer.enqueue(PendingUpload::new(path), cancel).await {
            EnqueueOutcome::Queued => queued += 1,
            EnqueueOutcome::Cancelled | EnqueueOutcome::Closed => {
                debug!(queued, "startup scan interrupted");
                break;
            }
        }
    }

    info!(dir = %dir.display(), queued, "queued existing files from startup scan");
    Ok(queued)
}
