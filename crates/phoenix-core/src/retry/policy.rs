use std::time::Duration;

use super::error::ErrorKind;

/// Upper bound on any backoff delay, whatever the base or attempt.
pub const MAX_RETRY_DELAY: Duration = Duration::from_millis(8000);

/// Backoff before retry number `attempt + 1`: `base * 2^attempt`, capped at
/// [`MAX_RETRY_DELAY`]. Saturates instead of overflowing.
pub fn retry_delay(attempt: u32, base: Duration) -> Duration {
    let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(MAX_RETRY_DELAY)
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry; the error is terminal.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Bounded exponential backoff, applied to rate-limit errors only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first failed attempt.
    pub max_retries: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after a failure classified as `kind`.
    ///
    /// `attempt` is the number of retries already taken (0 for the first call).
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if !kind.is_retryable() || attempt >= self.max_retries {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(retry_delay(attempt, self.base_delay))
    }

    /// Delays of every retry this policy allows, in order.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_retries).map(move |a| retry_delay(a, self.base_delay))
    }
}
