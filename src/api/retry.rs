//! Retry policy for API operations.
//!
//! Every client operation runs through [`run_with_retry`]: up to three
//! attempts, exponential backoff between them, and a non-blocking warning
//! before each wait. Classification is a pure function over the attempt
//! result so the policy can be tested apart from timing and HTTP.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::ApiError;
use crate::context::Notifier;

/// Maximum number of attempts per operation (first try included).
pub const MAX_ATTEMPTS: u32 = 3;

/// Base delay between retries in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// Result of a single attempt after classification.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The attempt succeeded; no further attempts are made.
    Success(T),
    /// The attempt failed with a server-side or transport error; another
    /// attempt may follow.
    Retryable(ApiError),
    /// The attempt failed with a client-side (4xx) error; retrying cannot
    /// help.
    Fatal(ApiError),
}

/// Classify one attempt's result.
///
/// Client-side failures (401, 403, any 4xx, missing credentials) are fatal;
/// everything else - 5xx, no response, unparseable body - is retryable.
pub fn classify<T>(result: Result<T, ApiError>) -> Outcome<T> {
    match result {
        Ok(value) => Outcome::Success(value),
        Err(e) if e.is_client_error() => Outcome::Fatal(e),
        Err(e) => Outcome::Retryable(e),
    }
}

/// Backoff delay before the attempt following `attempt` (1-based).
pub fn retry_delay_ms(attempt: u32) -> u64 {
    RETRY_DELAY_MS * 2u64.pow(attempt - 1)
}

/// Drive an operation through the retry policy.
///
/// `operation` names the call in retry warnings and logs. The factory is
/// invoked once per attempt; exactly one success short-circuits, a fatal
/// error propagates immediately, and after [`MAX_ATTEMPTS`] the last error
/// is returned.
pub async fn run_with_retry<T, F, Fut>(
    notifier: &dyn Notifier,
    operation: &str,
    f: F,
) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 1;
    loop {
        debug!("{}: attempt {}/{}", operation, attempt, MAX_ATTEMPTS);

        match classify(f().await) {
            Outcome::Success(value) => return Ok(value),
            Outcome::Fatal(e) => {
                debug!("{}: not retryable: {}", operation, e);
                return Err(e);
            }
            Outcome::Retryable(e) => {
                if attempt >= MAX_ATTEMPTS {
                    warn!("{}: giving up after {} attempts: {}", operation, attempt, e);
                    return Err(e);
                }
                let delay = retry_delay_ms(attempt);
                notifier.warn(&format!(
                    "{} failed (attempt {}/{}), retrying in {}ms: {}",
                    operation, attempt, MAX_ATTEMPTS, delay, e
                ));
                tokio::time::sleep(Duration::from_millis(delay)).await;
                attempt += 1;
            }
        }
    }
}
