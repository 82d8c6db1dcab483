// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{CONFIG_PATH_ENV, default_config_path};

/// Command-line arguments for `photo-uploader`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "photo-uploader",
    version,
    about = "Watch a directory and upload new photos with rclone.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Falls back to `CONFIG_PATH`, then `config.toml` in the current
    /// working directory.
    #[arg(
        long,
        value_name = "PATH",
        env = CONFIG_PATH_ENV,
        default_value_os_t = default_config_path()
    )]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PHOTO_UPLOADER_LOG` or `[logging].level` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load + validate the config, print the effective settings, and exit
    /// without watching or uploading anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_config_flag_is_used() {
        let args = CliArgs::parse_from(["photo-uploader", "--config", "/etc/uploader.toml"]);
        assert_eq!(args.config, PathBuf::from("/etc/uploader.toml"));
        assert!(!args.dry_run);
    }

    #[test]
    fn log_level_flag_parses() {
        let args =
            CliArgs::parse_from(["photo-uploader", "--log-level", "debug", "--dry-run"]);
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert!(args.dry_run);
    }
}
