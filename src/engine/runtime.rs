// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use notify::Event;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::ConfigFile;
use crate::errors::{Result, UploaderError};
use crate::exec::{UploadBackend, WorkerReport, WorkerSettings, spawn_workers};
use crate::watch::{
    ExtensionFilter, WatchSettings, WatcherHandle, enqueue_existing, run_watch_loop,
    watch_directory,
};

use super::queue::UploadQueue;

/// Owns every task of a running pipeline.
///
/// One watch loop feeds the queue, `concurrent_uploads` workers drain it, and
/// all of them share a single cancellation token. Nothing here is global;
/// each task receives its own clone of the token and queue handle.
pub struct Uploader {
    cancel: CancellationToken,
    queue: UploadQueue,
    watcher: Option<WatcherHandle>,
    watch_task: JoinHandle<()>,
    scan_task: Option<JoinHandle<()>>,
    workers: Vec<JoinHandle<WorkerReport>>,
}

impl fmt::Debug for Uploader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uploader")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("workers", &self.workers.len())
            .finish_non_exhaustive()
    }
}

impl Uploader {
    /// Start watching `cfg.watch_directory` and uploading through `backend`.
    ///
    /// Fails if the directory is missing or the OS watcher cannot be set up.
    pub async fn start(cfg: &ConfigFile, backend: Arc<dyn UploadBackend>) -> Result<Self> {
        let dir = &cfg.watch_directory;

        let is_dir = tokio::fs::metadata(dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(UploaderError::WatchDirectoryMissing(dir.clone()));
        }

        let (watcher, events) = watch_directory(dir)?;

        let mut uploader = Self::start_with_events(cfg, backend, events);
        uploader.watcher = Some(watcher);
        Ok(uploader)
    }

    /// Start the pipeline on an arbitrary notification channel instead of an
    /// OS watcher.
    ///
    /// The watch loop stops when every sender of `events` is dropped.
    pub fn start_with_events(
        cfg: &ConfigFile,
        backend: Arc<dyn UploadBackend>,
        events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let queue = UploadQueue::new(cfg.upload.queue_capacity);

        let watch_task = tokio::spawn(run_watch_loop(
            events,
            WatchSettings::from_config(cfg),
            queue.producer(),
            cancel.clone(),
        ));

        let workers = spawn_workers(
            cfg.upload.concurrent_uploads,
            queue.consumer(),
            backend,
            WorkerSettings::from_config(cfg),
            cancel.clone(),
        );

        let scan_task = cfg.upload.scan_existing.then(|| {
            let dir = cfg.watch_directory.clone();
            let filter = ExtensionFilter::from_config(cfg);
            let producer = queue.producer();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if let Err(err) = enqueue_existing(&dir, &filter, &producer, &cancel).await {
                    error!(dir = %dir.display(), error = %err, "startup scan failed");
                }
            })
        });

        info!(
            dir = %cfg.watch_directory.display(),
            workers = cfg.upload.concurrent_uploads,
            destination = %cfg.remote_destination(),
            "uploader started"
        );

        Self {
            cancel,
            queue,
            watcher: None,
            watch_task,
            scan_task,
            workers,
        }
    }

    /// Block until SIGINT (Ctrl-C) or, on unix, SIGTERM, then shut down.
    pub async fn run_until_signal(self) -> WorkerReport {
        shutdown_signal().await;
        self.shutdown().await
    }

    /// Stop everything and wait for all tasks.
    ///
    /// Order: cancel the token, drop the OS watcher, close the queue
    /// (discarding anything still buffered), then join. A worker that has
    /// already popped an item runs that item's remaining retries first.
    pub async fn shutdown(self) -> WorkerReport {
        info!("stopping uploader");

        self.cancel.cancel();
        drop(self.watcher);
        self.queue.close().await;

        if let Err(err) = self.watch_task.await {
            warn!(error = %err, "watch task ended abnormally");
        }
        if let Some(scan) = self.scan_task {
            if let Err(err) = scan.await {
                warn!(error = %err, "startup scan task ended abnormally");
            }
        }

        let mut total = WorkerReport::default();
        for worker in self.workers {
            match worker.await {
                Ok(report) => {
                    total.uploaded += report.uploaded;
                    total.failed += report.failed;
                }
                Err(err) => warn!(error = %err, "upload worker ended abnormally"),
            }
        }

        info!(
            uploaded = total.uploaded,
            failed = total.failed,
            "uploader stopped"
        );
        total
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT"),
        _ = terminate => info!("received SIGTERM"),
    }
}
