// src/watch/filter.rs

//! Extension allow-list.

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::{ConfigFile, normalize_extension};

/// Case-insensitive allow-list of file extensions.
///
/// Paths without an extension (including dotfiles like `.heic`) never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        }
    }

    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::new(&cfg.supported_extensions)
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&normalize_extension(ext)))
            .unwrap_or(false)
    }
}
