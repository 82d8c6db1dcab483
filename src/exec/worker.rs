// src/exec/worker.rs

//! Upload worker pool.

use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::ConfigFile;
use crate::engine::queue::QueueConsumer;
use crate::exec::backend::UploadBackend;
use crate::exec::upload::upload_with_retry;
use crate::types::{PendingUpload, RetryPolicy};

/// Per-item behaviour shared by every worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    pub retry: RetryPolicy,
    pub delete_after_upload: bool,
}

impl WorkerSettings {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            retry: RetryPolicy::new(cfg.upload.retry_count, cfg.upload.retry_delay()),
            delete_after_upload: cfg.rclone.delete_after_upload,
        }
    }
}

/// What a worker did before it exited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub uploaded: usize,
    pub failed: usize,
}

/// One worker: pops items in order and uploads them one at a time.
///
/// Holds no state across items besides its counters.
pub struct UploadWorker {
    id: usize,
    consumer: QueueConsumer,
    backend: Arc<dyn UploadBackend>,
    settings: WorkerSettings,
    cancel: CancellationToken,
}

impl std::fmt::Debug for UploadWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadWorker")
            .field("id", &self.id)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl UploadWorker {
    pub fn new(
        id: usize,
        consumer: QueueConsumer,
        backend: Arc<dyn UploadBackend>,
        settings: WorkerSettings,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            consumer,
            backend,
            settings,
            cancel,
        }
    }

    /// Run until cancellation or queue closure.
    pub async fn run(self) -> WorkerReport {
        info!(worker = self.id, "upload worker started");

        let mut report = WorkerReport::default();

        while let Some(item) = self.consumer.next(&self.cancel).await {
            if self.process(item).await {
                report.uploaded += 1;
            } else {
                report.failed += 1;
            }
        }

        info!(
            worker = self.id,
            uploaded = report.uploaded,
            failed = report.failed,
            "upload worker stopped"
        );
        report
    }

    /// Upload a single item; returns true on success.
    ///
    /// Failed items are logged and dropped, never requeued.
    async fn process(&self, item: PendingUpload) -> bool {
        info!(worker = self.id, path = %item, "uploading file");

        let result = upload_with_retry(
            self.backend.as_ref(),
            &item,
            self.settings.retry,
            self.id,
        )
        .await;

        match result {
            Ok(attempts) => {
                info!(worker = self.id, path = %item, attempts, "upload completed");
                if self.settings.delete_after_upload {
                    remove_uploaded_file(self.id, item.path()).await;
                }
                true
            }
            Err(err) => {
                error!(worker = self.id, path = %item, error = %err, "upload failed; dropping file");
                false
            }
        }
    }
}

async fn remove_uploaded_file(worker: usize, path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!(worker, path = %path.display(), "deleted local file"),
        Err(err) => error!(
            worker,
            path = %path.display(),
            error = %err,
            "failed to delete local file after upload"
        ),
    }
}

/// Spawn `count` workers sharing one consumer, backend and token.
pub fn spawn_workers(
    count: usize,
    consumer: QueueConsumer,
    backend: Arc<dyn UploadBackend>,
    settings: WorkerSettings,
    cancel: CancellationToken,
) -> Vec<JoinHandle<WorkerReport>> {
    debug!(count, ?settings, "spawning upload workers");

    (0..count)
        .map(|id| {
            let worker = UploadWorker::new(
                id,
                consumer.clone(),
                Arc::clone(&backend),
                settings,
                cancel.clone(),
            );
            tokio::spawn(worker.run())
        })
        .collect()
}
