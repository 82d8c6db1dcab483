// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Filtering paths against the extension allow-list.
//! - Wiring up a cross-platform filesystem watcher (`notify`) for a single
//!   directory and turning "created" events into queued uploads after the
//!   settle delay.
//! - Optionally queueing files that already exist at startup.
//!
//! It knows nothing about uploading; it only feeds the queue.

pub mod filter;
pub mod scan;
pub mod watcher;

pub use filter::ExtensionFilter;
pub use scan::{enqueue_existing, existing_files};
pub use watcher::{WatchSettings, WatcherHandle, created_paths, run_watch_loop, watch_directory};
