//! Bounded retry with a configurable delay policy
//!
//! This module runs an operation up to [`RetryConfig::max_attempts`] times,
//! sleeping between attempts. The default policy is a fixed delay; a backoff
//! multiplier above 1.0 gives exponential backoff capped at `max_delay`, and
//! optional jitter spreads retries out.
//!
//! # Example
//!
//! ```no_run
//! use report_dl::retry::{IsRetryable, with_retry};
//! use report_dl::config::RetryConfig;
//!
//! #[derive(Debug)]
//! enum MyError {
//!     Transient,
//!     Permanent,
//! }
//!
//! impl std::fmt::Display for MyError {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "{:?}", self)
//!     }
//! }
//!
//! impl IsRetryable for MyError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, MyError::Transient)
//!     }
//! }
//!
//! # async fn example() -> Result<(), MyError> {
//! let config = RetryConfig::default();
//! let outcome = with_retry(&config, |_attempt| async {
//!     Ok::<_, MyError>(())
//! })
//! .await;
//! outcome.result?;
//! # Ok(())
//! # }
//! ```

use crate::config::RetryConfig;
use crate::error::Error;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (timeouts, connection resets, server-side statuses) should return `true`.
/// Permanent failures (rejected credentials, local disk errors, bad configuration) should return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // Any transport failure, including a body stream cut mid-transfer
            Error::Network(e) => !e.is_builder(),
            // Non-success status on a download is treated as transient
            Error::HttpStatus { .. } => true,
            // A rejected session will be rejected again
            Error::Auth { .. } => false,
            // Only connection-flavoured I/O errors are worth repeating
            Error::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::NotConnected
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::Interrupted
            ),
            Error::Config { .. } => false,
            Error::Parse(_) => false,
            Error::MissingData { .. } => false,
            Error::Download(_) => false,
            Error::Serialization(_) => false,
        }
    }
}

/// Result of a retried operation together with the number of attempts it took
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    /// Final result: the first success, or the error of the last attempt
    pub result: Result<T, E>,
    /// Attempts actually made (1-based, never more than `max_attempts`)
    pub attempts: u32,
}

/// Execute an async operation, retrying transient failures
///
/// The operation receives the 1-based attempt number. A non-retryable error
/// ends the loop immediately. `max_attempts` of 0 is treated as 1.
///
/// # Arguments
///
/// * `config` - Retry configuration (attempt budget, delays, backoff multiplier, jitter)
/// * `operation` - Async closure that returns `Result<T, E>` where `E` implements [`IsRetryable`]
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> RetryOutcome<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;
    let mut delay = config.initial_delay;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempts = attempt, "Operation succeeded after retry");
                }
                return RetryOutcome {
                    result: Ok(value),
                    attempts: attempt,
                };
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let wait = if config.jitter { add_jitter(delay) } else { delay };

                tracing::warn!(
                    error = %e,
                    attempt,
                    max_attempts,
                    delay_ms = wait.as_millis(),
                    "Attempt failed, retrying"
                );

                if !wait.is_zero() {
                    tokio::time::sleep(wait).await;
                }

                let next_delay =
                    Duration::from_secs_f64(delay.as_secs_f64() * config.backoff_multiplier);
                delay = next_delay.min(config.max_delay);
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::error!(
                        error = %e,
                        attempts = attempt,
                        "Operation failed after all attempts exhausted"
                    );
                } else {
                    tracing::error!(error = %e, attempt, "Operation failed with non-retryable error");
                }
                return RetryOutcome {
                    result: Err(e),
                    attempts: attempt,
                };
            }
        }
    }
}

/// Add random jitter to a delay
///
/// Jitter is uniformly distributed between 0% and 100% of the delay,
/// so the result lies between `delay` and `2 * delay`.
fn add_jitter(delay: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let jitter_factor: f64 = rng.gen_range(0.0..=1.0);
    Duration::from_secs_f64(delay.as_secs_f64() * (1.0 + jitter_factor))
}
