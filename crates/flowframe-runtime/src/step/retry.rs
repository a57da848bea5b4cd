//! Retry policy for remote calls made by steps.

use std::future::Future;
use std::time::Duration;

use super::{StepError, StepResult, TRACING_TARGET};

/// How a step retries transient remote failures.
///
/// Only errors for which [`flowframe_client::Error::is_retryable`] returns
/// `true` are retried. Everything else fails the step immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay between attempts.
    pub retry_delay: Duration,
}

impl RetryPolicy {
    /// Creates a retry policy.
    pub const fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// A policy that never retries.
    pub const fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Runs `operation` until it succeeds, fails terminally or runs out of
    /// retries, all within `timeout`.
    pub async fn run<T, F, Fut>(&self, timeout: Duration, mut operation: F) -> StepResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = flowframe_client::Result<T>>,
    {
        let attempts = async {
            let mut attempt = 0u32;
            loop {
                match operation().await {
                    Ok(value) => return Ok(value),
                    Err(error) if error.is_retryable() && attempt < self.max_retries => {
                        attempt += 1;
                        tracing::warn!(
                            target: TRACING_TARGET,
                            attempt,
                            max_retries = self.max_retries,
                            error = %error,
                            "Retrying remote call"
                        );
                        tokio::time::sleep(self.retry_delay).await;
                    }
                    Err(error) => return Err(StepError::Client(error)),
                }
            }
        };

        tokio::time::timeout(timeout, attempts)
            .await
            .map_err(|_| StepError::Timeout(timeout))?
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use flowframe_client::{Error, ErrorKind};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn retries_transient_errors_then_succeeds() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let policy = RetryPolicy::new(3, Duration::from_millis(10));

        let value = policy
            .run(Duration::from_secs(5), move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(Error::service_unavailable())
                } else {
                    Ok(7)
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_errors_are_not_retried() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let err = RetryPolicy::default()
            .run(Duration::from_secs(5), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(Error::invalid_input())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StepError::Client(e) if e.kind() == ErrorKind::InvalidInput));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let err = RetryPolicy::new(2, Duration::from_millis(1))
            .run(Duration::from_secs(5), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(Error::rate_limited())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StepError::Client(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_bounds_all_attempts() {
        let err = RetryPolicy::new(100, Duration::from_secs(1))
            .run(Duration::from_millis(2500), || async {
                Err::<(), _>(Error::network_error())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StepError::Timeout(d) if d == Duration::from_millis(2500)));
    }
}
