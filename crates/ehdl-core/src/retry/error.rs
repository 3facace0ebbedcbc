//! Request error types for retry classification.

use std::io;
use thiserror::Error;

/// Error returned by a single HTTP request attempt (page or image).
/// Classified before deciding whether the attempt is repeated.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The response declared no `Content-Length`, so the body cannot be verified.
    #[error("response has no Content-Length")]
    MissingContentLength,
    /// The body was written but the file size differs from the declared length.
    #[error("size mismatch: expected {expected} bytes, file has {received}")]
    SizeMismatch { expected: u64, received: u64 },
    /// Disk write failed (e.g. disk full, permission denied). Not retried.
    #[error("storage: {0}")]
    Storage(#[source] io::Error),
}

/// Outcome of a request site whose attempts all failed.
#[derive(Debug, Error)]
pub enum RetryError {
    /// Every attempt of the budget failed with a retryable error.
    #[error("gave up after {attempts} attempts")]
    Exhausted {
        attempts: u32,
        #[source]
        last: FetchError,
    },
    /// The error is not worth repeating (4xx, storage, missing length).
    #[error(transparent)]
    Fatal(FetchError),
}

impl RetryError {
    /// The error of the last attempt.
    pub fn last(&self) -> &FetchError {
        match self {
            RetryError::Exhausted { last, .. } => last,
            RetryError::Fatal(e) => e,
        }
    }
}
