use std::time::Duration;

/// Across suggested-fees endpoint
///
/// See <https://docs.across.to/reference/api-reference#suggested-fees>
pub const ACROSS_SUGGESTED_FEES_URL: &str = "https://app.across.to/api/suggested-fees";

/// Upper bound on a single quote HTTP request.
pub const QUOTE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry policy for quote requests.
///
/// Only transient failures are retried (see
/// [`BridgeError::is_retryable_quote_error`](crate::BridgeError::is_retryable_quote_error)).
/// The delay before retry `n` (1-based) is
/// `initial_backoff_ms * backoff_multiplier^(n - 1)`.
///
/// # Examples
///
/// ```rust
/// use across_bridge::RetryConfig;
/// use std::time::Duration;
///
/// // 3 attempts: wait 500ms, then 1s
/// let config = RetryConfig::default();
/// assert_eq!(config.backoff_for_retry(1), Duration::from_millis(500));
/// assert_eq!(config.backoff_for_retry(2), Duration::from_millis(1000));
///
/// let config = RetryConfig::default()
///     .with_max_attempts(5)
///     .with_initial_backoff_ms(100);
/// assert_eq!(config.max_attempts, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff_ms: u64,
    /// Factor applied to the delay after every retry.
    pub backoff_multiplier: u32,
}

impl Default for RetryConfig {
    /// - `max_attempts`: 3
    /// - `initial_backoff_ms`: 500
    /// - `backoff_multiplier`: 2
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            backoff_multiplier: 2,
        }
    }
}

impl RetryConfig {
    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_initial_backoff_ms(mut self, millis: u64) -> Self {
        self.initial_backoff_ms = millis;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: u32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Delay to wait before retry number `retry` (the first retry is 1).
    pub fn backoff_for_retry(&self, retry: u32) -> Duration {
        let factor = (self.backoff_multiplier as u64).saturating_pow(retry.saturating_sub(1));
        Duration::from_millis(self.initial_backoff_ms.saturating_mul(factor))
    }

    /// Sum of all backoff delays when every attempt fails.
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts).map(|retry| self.backoff_for_retry(retry)).sum()
    }
}
