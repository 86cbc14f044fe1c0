//! Fixed-backoff retry for rate-limited model calls
//!
//! Only failures flagged as rate limits are retried; everything else is
//! returned on the spot.

use ohlc_llm::{LlmError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry policy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first call included
    pub max_attempts: u32,

    /// Wait after a rate-limited attempt
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Check if an error is retryable
    fn is_retryable(error: &LlmError) -> bool {
        error.is_rate_limited()
    }

    /// Execute an async operation with retry logic
    ///
    /// # Arguments
    ///
    /// * `operation_name` - Name of the operation (for logging)
    /// * `operation` - Async operation to execute
    ///
    /// # Returns
    ///
    /// Result of the operation, or the last error once attempts run out
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;

        loop {
            debug!(
                "Attempt {}/{} for operation: {}",
                attempt, self.max_attempts, operation_name
            );

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(
                            "Operation '{}' succeeded after {} retries",
                            operation_name,
                            attempt - 1
                        );
                    }
                    return Ok(result);
                }
                Err(e) if !Self::is_retryable(&e) => {
                    debug!("Operation '{}' failed with non-retryable error", operation_name);
                    return Err(e);
                }
                Err(e) if attempt >= self.max_attempts => {
                    warn!(
                        "Operation '{}' still rate limited after {} attempts: {}",
                        operation_name, self.max_attempts, e
                    );
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        "Rate limit hit for '{}' (attempt {}/{}): {}. Retrying in {:?}",
                        operation_name, attempt, self.max_attempts, e, self.backoff
                    );
                    sleep(self.backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn rate_limited() -> LlmError {
        LlmError::RateLimitExceeded("429 Too Many Requests".to_string())
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff, Duration::from_secs(60));
    }

    #[test]
    fn test_at_least_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
        assert_eq!(RetryPolicy::new(1, Duration::ZERO).max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_rate_limits() {
        for failures in 0..=2u32 {
            let policy = RetryPolicy::default();
            let calls = Arc::new(AtomicU32::new(0));
            let counter = calls.clone();
            let started = Instant::now();

            let result = policy
                .execute("generate", || {
                    let counter = counter.clone();
                    async move {
                        let n = counter.fetch_add(1, Ordering::SeqCst);
                        if n < failures { Err(rate_limited()) } else { Ok(n) }
                    }
                })
                .await;

            assert_eq!(result.unwrap(), failures);
            assert_eq!(calls.load(Ordering::SeqCst), failures + 1);
            assert_eq!(
                started.elapsed().as_secs(),
                u64::from(failures) * 60,
                "waits for {failures} rate limits"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_rate_limits_return_last_error() {
        let policy = RetryPolicy::default();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let started = Instant::now();

        let result: Result<()> = policy
            .execute("generate", || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(rate_limited())
                }
            })
            .await;

        assert!(result.unwrap_err().is_rate_limited());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // No wait after the final attempt
        assert_eq!(started.elapsed().as_secs(), 120);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error() {
        let policy = RetryPolicy::default();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let started = Instant::now();

        let result: Result<()> = policy
            .execute("generate", || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(LlmError::AuthenticationFailed)
                }
            })
            .await;

        assert!(matches!(result, Err(LlmError::AuthenticationFailed)));
        assert_eq!(calls.load(Ordering::SeqCst), 1); // Should not retry
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
