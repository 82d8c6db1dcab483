use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use photo_uploader::errors::Result;
use photo_uploader::exec::{AttemptOutcome, UploadBackend};

/// One recorded call to the fake backend.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub path: PathBuf,
    pub started_at: Instant,
}

/// A fake upload backend that:
/// - records every invocation (path + start time)
/// - answers from a script of outcomes, then falls back to a fixed outcome
/// - optionally takes `delay` per call, to simulate a slow upload.
///
/// Clones share the same script and call log.
#[derive(Debug, Clone)]
pub struct FakeUploader {
    script: Arc<Mutex<VecDeque<AttemptOutcome>>>,
    fallback: AttemptOutcome,
    delay: Duration,
    calls: Arc<Mutex<Vec<Invocation>>>,
}

impl FakeUploader {
    pub fn with_script(
        outcomes: impl IntoIterator<Item = AttemptOutcome>,
        fallback: AttemptOutcome,
    ) -> Self {
        Self {
            script: Arc::new(Mutex::new(outcomes.into_iter().collect())),
            fallback,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_script([], AttemptOutcome::Success)
    }

    pub fn failing() -> Self {
        Self::with_script([], AttemptOutcome::Failed { exit_code: Some(1) })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn uploaded_paths(&self) -> Vec<PathBuf> {
        self.calls().into_iter().map(|c| c.path).collect()
    }
}

impl UploadBackend for FakeUploader {
    fn upload<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<AttemptOutcome>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Invocation {
                path: path.to_path_buf(),
                started_at: Instant::now(),
            });

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let next = self.script.lock().unwrap().pop_front();
            Ok(next.unwrap_or(self.fallback))
        })
    }
}
