// src/engine/queue.rs

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::types::PendingUpload;

/// Result of trying to push an item onto the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Queued,
    /// The caller's cancellation token fired while waiting for space.
    Cancelled,
    /// The queue was closed; the item was dropped.
    Closed,
}

/// Bounded FIFO of pending uploads shared by the watcher and the workers.
///
/// Semantics:
/// - Pushes wait while the queue is full, unless the caller's cancellation
///   token fires, in which case the push is abandoned.
/// - Any number of workers may pop concurrently; each item is handed to
///   exactly one of them.
/// - `close()` stops further pushes and discards whatever is still buffered.
///   Nothing is persisted.
#[derive(Debug)]
pub struct UploadQueue {
    producer: QueueProducer,
    consumer: QueueConsumer,
    closed: CancellationToken,
}

impl UploadQueue {
    /// Create a queue holding at most `capacity` items (clamped to >= 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let closed = CancellationToken::new();

        Self {
            producer: QueueProducer {
                tx,
                closed: closed.clone(),
            },
            consumer: QueueConsumer {
                rx: Arc::new(Mutex::new(rx)),
                closed: closed.clone(),
            },
            closed,
        }
    }

    pub fn producer(&self) -> QueueProducer {
        self.producer.clone()
    }

    pub fn consumer(&self) -> QueueConsumer {
        self.consumer.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Close the queue and return how many buffered items were discarded.
    ///
    /// Consumers blocked in [`QueueConsumer::next`] return `None`; pending
    /// pushes return [`EnqueueOutcome::Closed`].
    pub async fn close(&self) -> usize {
        self.closed.cancel();

        let mut rx = self.consumer.rx.lock().await;
        rx.close();

        let mut discarded = 0;
        while rx.try_recv().is_ok() {
            discarded += 1;
        }

        if discarded > 0 {
            warn!(discarded, "upload queue closed with pending items; discarding them");
        } else {
            debug!("upload queue closed");
        }
        discarded
    }
}

/// Sending half, cloned into the watcher and its settle tasks.
#[derive(Debug, Clone)]
pub struct QueueProducer {
    tx: mpsc::Sender<PendingUpload>,
    closed: CancellationToken,
}

impl QueueProducer {
    /// Push `item`, waiting for space if the queue is full.
    pub async fn enqueue(
        &self,
        item: PendingUpload,
        cancel: &CancellationToken,
    ) -> EnqueueOutcome {
        if self.closed.is_cancelled() {
            return EnqueueOutcome::Closed;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => EnqueueOutcome::Cancelled,
            _ = self.closed.cancelled() => EnqueueOutcome::Closed,
            res = self.tx.send(item) => match res {
                Ok(()) => EnqueueOutcome::Queued,
                Err(_) => EnqueueOutcome::Closed,
            },
        }
    }

    /// Number of items currently buffered.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Receiving half, shared by all workers.
#[derive(Debug, Clone)]
pub struct QueueConsumer {
    rx: Arc<Mutex<mpsc::Receiver<PendingUpload>>>,
    closed: CancellationToken,
}

impl QueueConsumer {
    /// Pop the next item.
    ///
    /// Returns `None` once `cancel` fires, the queue is closed, or every
    /// producer has been dropped and the buffer is empty.
    pub async fn next(&self, cancel: &CancellationToken) -> Option<PendingUpload> {
        let mut rx = tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            _ = self.closed.cancelled() => return None,
            guard = self.rx.lock() => guard,
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            _ = self.closed.cancelled() => None,
            item = rx.recv() => item,
        }
    }
}
