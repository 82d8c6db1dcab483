// src/exec/backend.rs

//! Pluggable upload backend abstraction.
//!
//! Workers talk to an `UploadBackend` instead of spawning processes
//! directly, so tests can swap in a scripted fake while production uses
//! [`RcloneBackend`].

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::debug;

use crate::config::ConfigFile;
use crate::errors::Result;

use super::command::RcloneCommand;

/// Result of a single invocation of the sync tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    /// Non-zero exit. `exit_code` is `None` when the process died from a
    /// signal.
    Failed { exit_code: Option<i32> },
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }
}

/// Trait abstracting one upload attempt for one file.
///
/// `Err` means the attempt could not even be made (e.g. the binary is
/// missing); callers treat it like a failed attempt.
pub trait UploadBackend: Send + Sync {
    fn upload<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<AttemptOutcome>> + Send + 'a>>;
}

/// Production backend: runs `rclone copy` and waits for it to exit.
///
/// The child inherits stdout/stderr so the tool's progress output is passed
/// straight through. A started invocation is never killed; it always runs to
/// completion.
#[derive(Debug, Clone)]
pub struct RcloneBackend {
    command: RcloneCommand,
}

impl RcloneBackend {
    pub fn new(command: RcloneCommand) -> Self {
        Self { command }
    }

    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::new(RcloneCommand::from_config(cfg))
    }
}

impl UploadBackend for RcloneBackend {
    fn upload<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<AttemptOutcome>> + Send + 'a>> {
        Box::pin(async move {
            debug!(cmd = %self.command.display_for(path), "invoking sync tool");

            let status = Command::new(&self.command.binary)
                .args(self.command.args_for(path))
                .stdin(Stdio::null())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await
                .with_context(|| format!("running {:?}", self.command.binary))?;

            if status.success() {
                Ok(AttemptOutcome::Success)
            } else {
                Ok(AttemptOutcome::Failed {
                    exit_code: status.code(),
                })
            }
        })
    }
}
