// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::config::ConfigFile;
use crate::engine::queue::{EnqueueOutcome, QueueProducer};
use crate::errors::Result;
use crate::types::PendingUpload;
use crate::watch::filter::ExtensionFilter;

/// What the watch loop needs besides its channels.
#[derive(Debug, Clone)]
pub struct WatchSettings {
    pub filter: ExtensionFilter,
    pub settle_delay: Duration,
}

impl WatchSettings {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            filter: ExtensionFilter::from_config(cfg),
            settle_delay: cfg.upload.settle_delay(),
        }
    }
}

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping it stops the
/// OS watch and closes the notification channel, which ends the watch loop.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Start watching `dir` (non-recursively).
///
/// Returns the watcher handle and the receiving end of the notification
/// channel, to be driven by [`run_watch_loop`].
pub fn watch_directory(
    dir: &Path,
) -> Result<(WatcherHandle, mpsc::UnboundedReceiver<notify::Result<Event>>)> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            // The loop may already be gone during shutdown.
            let _ = event_tx.send(res);
        },
        Config::default(),
    )?;

    watcher.watch(dir, RecursiveMode::NonRecursive)?;

    info!(dir = %dir.display(), "file watcher started");

    Ok((WatcherHandle { _inner: watcher }, event_rx))
}

/// Consume notification results until the channel closes or `cancel` fires.
///
/// Each qualifying path is settled in its own task so a burst of new files
/// is not serialised behind one settle delay. Those tasks are awaited before
/// returning.
pub async fn run_watch_loop(
    mut events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    settings: WatchSettings,
    producer: QueueProducer,
    cancel: CancellationToken,
) {
    let mut settling: JoinSet<()> = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("watch loop cancelled");
                break;
            }
            Some(joined) = settling.join_next(), if !settling.is_empty() => {
                if let Err(err) = joined {
                    warn!(error = %err, "settle task ended abnormally");
                }
            }
            msg = events.recv() => match msg {
                Some(Ok(event)) => {
                    trace!(?event, "received notify event");
                    for path in created_paths(&event) {
                        if !settings.filter.matches(&path) {
                            continue;
                        }
                        info!(path = %path.display(), "new file detected");
                        settling.spawn(settle_and_enqueue(
                            PendingUpload::new(path),
                            settings.settle_delay,
                            producer.clone(),
                            cancel.clone(),
                        ));
                    }
                }
                Some(Err(err)) => {
                    error!(error = %err, "file watch error");
                }
                None => {
                    info!("notification channel closed; stopping watch loop");
                    break;
                }
            },
        }
    }

    while settling.join_next().await.is_some() {}
    debug!("watch loop finished");
}

/// Paths that came into existence through this event.
///
/// Besides plain creations this includes files renamed/moved into the
/// directory, which inotify reports as a rename rather than a create.
/// A rename within the directory arrives as `Name(To)` followed by a
/// `Name(Both)` for the same move; only the `To` half counts.
pub fn created_paths(event: &Event) -> Vec<PathBuf> {
    match event.kind {
        EventKind::Create(_) => event.paths.clone(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths.clone(),
        _ => Vec::new(),
    }
}

async fn settle_and_enqueue(
    item: PendingUpload,
    delay: Duration,
    producer: QueueProducer,
    cancel: CancellationToken,
) {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(path = %item, "shutdown during settle delay; not queueing");
            return;
        }
        _ = tokio::time::sleep(delay) => {}
    }

    let label = item.to_string();
    match producer.enqueue(item, &cancel).await {
        EnqueueOutcome::Queued => debug!(path = %label, "queued for upload"),
        EnqueueOutcome::Cancelled => debug!(path = %label, "shutdown while queue full; not queued"),
        EnqueueOutcome::Closed => warn!(path = %label, "upload queue closed; dropping file"),
    }
}
