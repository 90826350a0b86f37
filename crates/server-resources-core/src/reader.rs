//! Retrying whole-file reads.
//!
//! Resource files may be briefly locked by installers or virus scanners, so
//! reads are retried a bounded number of times with a fixed delay. A file
//! that is missing at the start of an attempt fails immediately.

use std::fs;
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, Result};
use crate::logging::targets;

/// Retry configuration for file reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total number of read attempts (at least one is always made).
    pub attempts: u32,
    /// Fixed delay between attempts in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes a single attempt.
    pub const fn no_retry() -> Self {
        Self {
            attempts: 1,
            delay_ms: 0,
        }
    }

    /// Create a policy with the given attempt count and delay.
    pub const fn new(attempts: u32, delay_ms: u64) -> Self {
        Self { attempts, delay_ms }
    }

    /// The delay between attempts.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Read a whole file into memory, retrying transient failures.
///
/// # Errors
///
/// - [`ResourceError::FileMissing`] if the file does not exist at the start
///   of any attempt (no further attempts are made)
/// - [`ResourceError::Io`] with the error of the final attempt
pub fn read_with_retry(path: &Path, policy: &RetryPolicy) -> Result<Vec<u8>> {
    retry_read(path, policy, || fs::read(path))
}

fn retry_read<F>(path: &Path, policy: &RetryPolicy, mut read: F) -> Result<Vec<u8>>
where
    F: FnMut() -> io::Result<Vec<u8>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        if !path.exists() {
            return Err(ResourceError::file_missing(path));
        }

        match read() {
            Ok(data) => return Ok(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ResourceError::file_missing(path));
            }
            Err(e) if attempt < attempts => {
                tracing::debug!(
                    target: targets::LOADER,
                    path = %path.display(),
                    attempt,
                    error = %e,
                    "read failed, retrying"
                );
                thread::sleep(policy.delay());
                attempt += 1;
            }
            Err(e) => return Err(ResourceError::io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"payload").unwrap();

        let data = read_with_retry(&path, &RetryPolicy::default()).unwrap();
        assert_eq!(data, b"payload");
    }

    #[test]
    fn test_missing_file_fails_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.bin");

        // A long delay would make the test hang if the read were retried.
        let policy = RetryPolicy::new(3, 60_000);
        let err = read_with_retry(&path, &policy).unwrap_err();
        assert!(err.is_file_missing());
    }

    fn locked() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "sharing violation")
    }

    #[test]
    fn test_transient_failure_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"payload").unwrap();

        let mut calls = 0;
        let data = retry_read(&path, &RetryPolicy::new(3, 0), || {
            calls += 1;
            if calls < 3 { Err(locked()) } else { fs::read(&path) }
        })
        .unwrap();
        assert_eq!(data, b"payload");
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_attempts_are_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"payload").unwrap();

        let mut calls = 0;
        let err = retry_read(&path, &RetryPolicy::new(3, 0), || {
            calls += 1;
            Err(locked())
        })
        .unwrap_err();
        assert!(matches!(err, ResourceError::Io { .. }));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_vanished_file_stops_retrying() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"payload").unwrap();

        let mut calls = 0;
        let err = retry_read(&path, &RetryPolicy::new(3, 0), || {
            calls += 1;
            fs::remove_file(&path)?;
            Err(locked())
        })
        .unwrap_err();
        assert!(err.is_file_missing());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_final_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();

        // Reading a directory fails with an error other than NotFound.
        let err = read_with_retry(dir.path(), &RetryPolicy::new(2, 0)).unwrap_err();
        assert!(matches!(err, ResourceError::Io { .. }));
    }
}
