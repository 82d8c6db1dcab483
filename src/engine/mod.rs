// src/engine/mod.rs

//! Pipeline orchestration: the pending-upload queue and the lifecycle
//! controller that starts and stops the watcher and the worker pool.

pub mod queue;
pub mod runtime;

pub use queue::{EnqueueOutcome, QueueConsumer, QueueProducer, UploadQueue};
pub use runtime::Uploader;
