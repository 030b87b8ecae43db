//! Retry policy for calls against rate-limited remote services.
//!
//! Only [`ServiceError::RateLimited`] is retried. Any other failure aborts the
//! call at once and is handed back to the caller, who turns it into its own
//! fallback value. Running out of attempts is not an error: the wrapper returns
//! the caller-supplied fallback.

use std::future::Future;
use std::time::Duration;

use crate::error::ServiceError;

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed(Duration),
    /// `step * (attempt + 1)` where `attempt` is zero-based.
    Linear(Duration),
}

impl Backoff {
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Linear(step) => step
                .checked_mul(attempt.saturating_add(1))
                .unwrap_or(Duration::MAX),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry(Duration),
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first try.
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed(delay),
        }
    }

    pub fn linear(max_retries: u32, step: Duration) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Linear(step),
        }
    }

    /// Oracle defaults: 3 retries, 60s between them.
    pub fn oracle_default() -> Self {
        Self::fixed(3, Duration::from_secs(60))
    }

    /// Encyclopedia defaults: 2 retries, waiting 2s, then 4s.
    pub fn encyclopedia_default() -> Self {
        Self::linear(2, Duration::from_secs(2))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn classify(&self, err: &ServiceError, attempt: u32) -> RetryDecision {
        if err.is_rate_limited() {
            RetryDecision::Retry(self.backoff.delay(attempt))
        } else {
            RetryDecision::Abort
        }
    }
}

/// Run `operation` under `policy`.
///
/// Returns `Ok(value)` on success, `Ok(fallback)` once every attempt was rate
/// limited, and `Err` as soon as a non-retryable failure occurs.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    fallback: T,
    mut operation: F,
) -> Result<T, ServiceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    let max_attempts = policy.max_attempts();

    for attempt in 0..max_attempts {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        match policy.classify(&err, attempt) {
            RetryDecision::Abort => {
                tracing::warn!("{label}: giving up on non-retryable error: {err}");
                return Err(err);
            }
            RetryDecision::Retry(_) if attempt + 1 == max_attempts => {
                tracing::warn!(
                    "{label}: {err} (attempt {}/{max_attempts}), no attempts left",
                    attempt + 1
                );
            }
            RetryDecision::Retry(delay) => {
                tracing::warn!(
                    "{label}: {err}. Sleeping {}s before retrying... (attempt {}/{max_attempts})",
                    delay.as_secs(),
                    attempt + 1
                );
                tokio::time::sleep(delay).await;
            }
        }
    }

    Ok(fallback)
}
