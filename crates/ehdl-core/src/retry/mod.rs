//! Retry and backoff policy.
//!
//! This module encapsulates error classification (timeouts, throttling,
//! connection failures, truncated bodies) and the attempt budget so that the
//! page fetcher and the image downloader share one consistent policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::{FetchError, RetryError};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
pub use run::run_with_retry;
