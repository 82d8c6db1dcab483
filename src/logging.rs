// src/logging.rs

//! Logging setup for `photo-uploader` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `PHOTO_UPLOADER_LOG` environment variable (e.g. "info", "debug")
//! 3. `[logging].level` from the config file
//! 4. default to `info`
//!
//! Logs go to STDERR unless `[logging].file_path` is set, so that the sync
//! tool's own output keeps stdout to itself.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;

use crate::cli::LogLevel;
use crate::config::LoggingSection;

/// Environment variable consulted when no `--log-level` flag is given.
pub const LOG_LEVEL_ENV: &str = "PHOTO_UPLOADER_LOG";

/// Initialise the global logging subscriber.
///
/// Must be called once at startup. When logging to a file the returned guard
/// flushes buffered lines on drop, so keep it alive until exit.
pub fn init_logging(
    cli_level: Option<LogLevel>,
    settings: &LoggingSection,
) -> Result<Option<WorkerGuard>> {
    let level = resolve_level(
        cli_level,
        std::env::var(LOG_LEVEL_ENV).ok().as_deref(),
        &settings.level,
    );

    let guard = match settings.file_path.as_deref() {
        None => {
            fmt()
                .with_max_level(level)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_writer(std::io::stderr)
                .init();
            None
        }
        Some(file_path) => {
            let appender = file_appender(file_path, settings.max_backups)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);

            fmt()
                .with_max_level(level)
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
    };

    if parse_level_str(&settings.level).is_none() {
        warn!(level = %settings.level, "unknown [logging].level; falling back to info");
    }

    Ok(guard)
}

fn file_appender(file_path: &Path, max_backups: usize) -> Result<RollingFileAppender> {
    let dir = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("log file path {file_path:?} has no file name"))?;

    std::fs::create_dir_all(dir).with_context(|| format!("creating log dir {dir:?}"))?;

    let mut builder = RollingFileAppender::builder().filename_prefix(file_name);
    builder = if max_backups > 0 {
        builder.rotation(Rotation::DAILY).max_log_files(max_backups)
    } else {
        builder.rotation(Rotation::NEVER)
    };

    builder
        .build(dir)
        .with_context(|| format!("opening log file {file_path:?}"))
}

/// Pick the effective level from the CLI flag, the environment override and
/// the config value, in that order.
pub fn resolve_level(
    cli_level: Option<LogLevel>,
    env_level: Option<&str>,
    config_level: &str,
) -> tracing::Level {
    if let Some(lvl) = cli_level {
        return level_from_log_level(lvl);
    }
    env_level
        .and_then(parse_level_str)
        .or_else(|| parse_level_str(config_level))
        .unwrap_or(tracing::Level::INFO)
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

/// Parse a level name. `fatal` and `panic` are accepted as `error`.
pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "panic" | "fatal" | "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
