// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::engine::Uploader;
use crate::exec::{RcloneBackend, RcloneCommand};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the rclone backend
/// - watcher / queue / worker pool
/// - SIGINT + SIGTERM handling
///
/// Config loading and logging setup happen in `main.rs` because the logger
/// depends on the `[logging]` section.
pub async fn run(args: CliArgs, cfg: ConfigFile) -> Result<()> {
    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let backend = Arc::new(RcloneBackend::from_config(&cfg));
    let uploader = Uploader::start(&cfg, backend).await?;

    uploader.run_until_signal().await;
    Ok(())
}

/// Simple dry-run output: effective settings and the command line template.
fn print_dry_run(cfg: &ConfigFile) {
    let command = RcloneCommand::from_config(cfg);

    println!("photo-uploader dry-run");
    println!("  watch_directory = {}", cfg.watch_directory.display());
    println!("  supported_extensions = {:?}", cfg.supported_extensions);
    println!("  destination = {}", cfg.remote_destination());
    println!("  delete_after_upload = {}", cfg.rclone.delete_after_upload);
    println!("  check_duplicates = {}", cfg.rclone.check_duplicates);
    println!();
    println!("upload:");
    println!("  concurrent_uploads = {}", cfg.upload.concurrent_uploads);
    println!("  wait_time = {}s", cfg.upload.wait_time);
    println!("  retry_count = {}", cfg.upload.retry_count);
    println!("  retry_interval = {}s", cfg.upload.retry_interval);
    println!("  queue_capacity = {}", cfg.upload.queue_capacity);
    if cfg.upload.scan_existing {
        println!("  scan_existing = true");
    }
    println!();
    println!(
        "command: {}",
        command.display_for(&cfg.watch_directory.join(Path::new("<file>")))
    );

    debug!("dry-run complete (no watching, no uploads)");
}
