// src/exec/mod.rs

//! Upload execution layer.
//!
//! - [`command`] builds the `rclone copy` command line.
//! - [`backend`] provides the `UploadBackend` trait and the production
//!   `RcloneBackend`; tests replace it with a fake.
//! - [`upload`] runs one file through the retry loop.
//! - [`worker`] owns the worker loop and the pool spawner.

pub mod backend;
pub mod command;
pub mod upload;
pub mod worker;

pub use backend::{AttemptOutcome, RcloneBackend, UploadBackend};
pub use command::RcloneCommand;
pub use upload::upload_with_retry;
pub use worker::{UploadWorker, WorkerReport, WorkerSettings, spawn_workers};
