//! Retry loop: run a closure until success or the policy says stop.

use super::classify;
use super::error::{FetchError, RetryError};
use super::policy::{ErrorKind, RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
/// `what` names the request site in log lines (usually the URL).
pub fn run_with_retry<T, F>(policy: &RetryPolicy, what: &str, mut f: F) -> Result<T, RetryError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(e) => {
                let kind = classify::classify(&e);
                if kind == ErrorKind::Other {
                    return Err(RetryError::Fatal(e));
                }
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => {
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            last: e,
                        })
                    }
                    RetryDecision::RetryAfter(d) => {
                        tracing::warn!(
                            "{} failed (attempt {}/{}): {}; retrying in {:?}",
                            what,
                            attempt,
                            policy.max_attempts,
                            e,
                            d
                        );
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
