// src/exec/upload.rs

//! Single-file upload with a fixed retry loop.

use std::io::ErrorKind;

use tracing::warn;

use crate::errors::{Result, UploaderError};
use crate::exec::backend::{AttemptOutcome, UploadBackend};
use crate::types::{PendingUpload, RetryPolicy};

/// Upload one file, retrying up to `policy.max_attempts` times.
///
/// - If the file no longer exists, fails immediately with
///   [`UploaderError::FileMissing`] and the backend is never invoked.
/// - Between failed attempts sleeps `policy.interval`; there is no sleep
///   after the last attempt.
/// - Not cancellable: once a worker has popped an item, every attempt runs
///   even if shutdown begins in the meantime.
///
/// Returns the number of attempts used on success.
pub async fn upload_with_retry(
    backend: &dyn UploadBackend,
    item: &PendingUpload,
    policy: RetryPolicy,
    worker: usize,
) -> Result<u32> {
    let path = item.path();

    match tokio::fs::metadata(path).await {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(UploaderError::FileMissing(path.to_path_buf()));
        }
        Err(e) => return Err(UploaderError::Io(e)),
    }

    let max = policy.max_attempts.max(1);

    for attempt in 1..=max {
        match backend.upload(path).await {
            Ok(AttemptOutcome::Success) => return Ok(attempt),
            Ok(AttemptOutcome::Failed { exit_code }) => {
                warn!(
                    worker,
                    path = %item,
                    attempt,
                    max_attempts = max,
                    ?exit_code,
                    "upload attempt failed"
                );
            }
            Err(err) => {
                warn!(
                    worker,
                    path = %item,
                    attempt,
                    max_attempts = max,
                    error = %err,
                    "upload attempt could not run"
                );
            }
        }

        if attempt == max {
            break;
        }

        tokio::time::sleep(policy.interval).await;
    }

    Err(UploaderError::UploadFailed {
        path: path.to_path_buf(),
        attempts: max,
    })
}
