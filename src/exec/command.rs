// src/exec/command.rs

//! Command-line construction for the external sync tool.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::ConfigFile;

/// Everything needed to build `rclone copy <file> <remote>:<album> [--checksum]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcloneCommand {
    pub binary: PathBuf,
    pub destination: String,
    pub check_duplicates: bool,
}

impl RcloneCommand {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            binary: cfg.rclone.binary.clone(),
            destination: cfg.remote_destination(),
            check_duplicates: cfg.rclone.check_duplicates,
        }
    }

    /// Arguments (without the binary) for uploading `path`.
    pub fn args_for(&self, path: &Path) -> Vec<OsString> {
        let mut args = vec![
            OsString::from("copy"),
            path.as_os_str().to_os_string(),
            OsString::from(&self.destination),
        ];
        if self.check_duplicates {
            args.push(OsString::from("--checksum"));
        }
        args
    }

    /// Human-readable command line, used for logs and `--dry-run`.
    pub fn display_for(&self, path: &Path) -> String {
        let mut line = self.binary.display().to_string();
        for arg in self.args_for(path) {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(check_duplicates: bool) -> RcloneCommand {
        RcloneCommand {
            binary: PathBuf::from("rclone"),
            destination: "gphotos:album/Inbox".to_string(),
            check_duplicates,
        }
    }

    #[test]
    fn checksum_flag_follows_duplicate_check() {
        let path = Path::new("/inbox/a.heic");

        assert_eq!(
            command(true).args_for(path),
            vec!["copy", "/inbox/a.heic", "gphotos:album/Inbox", "--checksum"]
                .into_iter()
                .map(OsString::from)
                .collect::<Vec<_>>()
        );
        assert_eq!(command(false).args_for(path).len(), 3);
    }

    #[test]
    fn display_includes_binary() {
        let line = command(false).display_for(Path::new("a.heic"));
        assert_eq!(line, "rclone copy a.heic gphotos:album/Inbox");
    }
}
