#![allow(dead_code)]

pub use photo_uploader_test_utils::*;

use std::path::{Path, PathBuf};

use notify::Event;
use notify::event::{CreateKind, EventKind};

/// A synthetic "file created" notification for `path`.
pub fn created(path: impl AsRef<Path>) -> notify::Result<Event> {
    Ok(Event::new(EventKind::Create(CreateKind::File)).add_path(path.as_ref().to_path_buf()))
}

/// Create `name` inside `dir` with some bytes and return its path.
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"not really an image").expect("write test file");
    path
}
