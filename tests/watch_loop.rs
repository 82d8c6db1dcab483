// tests/watch_loop.rs

mod common;
use crate::common::{created, init_tracing, with_timeout};

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use notify::Event;
use notify::event::{CreateKind, DataChange, EventKind, ModifyKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use photo_uploader::engine::UploadQueue;
use photo_uploader::types::PendingUpload;
use photo_uploader::watch::{ExtensionFilter, WatchSettings, run_watch_loop};

type TestResult = Result<(), Box<dyn Error>>;

fn settings(settle_ms: u64) -> WatchSettings {
    WatchSettings {
        filter: ExtensionFilter::new([".heic", ".heif"]),
        settle_delay: Duration::from_millis(settle_ms),
    }
}

#[tokio::test]
async fn unsupported_extensions_are_never_queued() -> TestResult {
    init_tracing();

    let queue = UploadQueue::new(8);
    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(run_watch_loop(rx, settings(0), queue.producer(), cancel.clone()));

    for name in ["a.jpg", "b.txt", "c", "d.heic.part", ".heic"] {
        tx.send(created(format!("/inbox/{name}")))?;
    }
    drop(tx);

    with_timeout(handle).await?;
    assert!(queue.producer().is_empty());
    Ok(())
}

#[tokio::test]
async fn supported_extension_is_queued_once_after_settle_delay() -> TestResult {
    init_tracing();

    let queue = UploadQueue::new(8);
    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let producer = queue.producer();

    let handle = tokio::spawn(run_watch_loop(rx, settings(300), producer.clone(), cancel.clone()));

    tx.send(created("/inbox/IMG_0001.HEIC"))?;

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(producer.is_empty(), "queued before the settle delay elapsed");

    let popped = with_timeout(queue.consumer().next(&cancel)).await;
    assert_eq!(popped, Some(PendingUpload::new("/inbox/IMG_0001.HEIC")));

    drop(tx);
    with_timeout(handle).await?;
    assert!(producer.is_empty());
    Ok(())
}

#[tokio::test]
async fn only_creation_events_count() -> TestResult {
    init_tracing();

    let queue = UploadQueue::new(8);
    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(run_watch_loop(rx, settings(0), queue.producer(), cancel.clone()));

    tx.send(Ok(Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
        .add_path(PathBuf::from("/inbox/a.heic"))))?;
    tx.send(Ok(Event::new(EventKind::Create(CreateKind::File))
        .add_path(PathBuf::from("/inbox/b.heif"))))?;
    drop(tx);

    with_timeout(handle).await?;

    let consumer = queue.consumer();
    assert_eq!(
        consumer.next(&cancel).await,
        Some(PendingUpload::new("/inbox/b.heif"))
    );
    assert!(queue.producer().is_empty());
    Ok(())
}

#[tokio::test]
async fn recreated_path_is_queued_again() -> TestResult {
    init_tracing();

    let queue = UploadQueue::new(8);
    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(run_watch_loop(rx, settings(0), queue.producer(), cancel.clone()));

    tx.send(created("/inbox/a.heic"))?;
    tx.send(created("/inbox/a.heic"))?;
    drop(tx);

    with_timeout(handle).await?;
    assert_eq!(queue.producer().len(), 2);
    Ok(())
}

#[tokio::test]
async fn watcher_errors_do_not_stop_the_loop() -> TestResult {
    init_tracing();

    let queue = UploadQueue::new(8);
    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(run_watch_loop(rx, settings(0), queue.producer(), cancel.clone()));

    tx.send(Err(notify::Error::generic("inotify queue overflow")))?;
    tx.send(created("/inbox/a.heic"))?;
    drop(tx);

    with_timeout(handle).await?;
    assert_eq!(queue.producer().len(), 1);
    Ok(())
}

#[tokio::test]
async fn cancellation_during_settle_queues_nothing() -> TestResult {
    init_tracing();

    let queue = UploadQueue::new(8);
    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(run_watch_loop(rx, settings(60_000), queue.producer(), cancel.clone()));

    tx.send(created("/inbox/a.heic"))?;
    tokio::time::sleep(Duration::from_millis(50)).await;

    cancel.cancel();
    with_timeout(handle).await?;
    assert!(queue.producer().is_empty());
    Ok(())
}

#[tokio::test]
async fn pending_push_on_full_queue_aborts_on_cancel() -> TestResult {
    init_tracing();

    let queue = UploadQueue::new(1);
    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(run_watch_loop(rx, settings(0), queue.producer(), cancel.clone()));

    // Nobody consumes: the second push blocks on the full queue.
    tx.send(created("/inbox/a.heic"))?;
    tx.send(created("/inbox/b.heic"))?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!handle.is_finished());

    cancel.cancel();
    with_timeout(handle).await?;
    assert_eq!(queue.producer().len(), 1);
    Ok(())
}
