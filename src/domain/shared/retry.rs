use crate::infrastructure::repositories::ProviderError;
use std::future::Future;
use std::time::Duration;

const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(200);
const MAX_DELAY: Duration = Duration::from_secs(5);

/// Bounded retry with exponential backoff for provider calls.
///
/// Only `ProviderError::Unavailable` is retried; a rejected or failed
/// request would fail the same way again. `max_retries == 0` means a
/// single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }

    pub fn none() -> Self {
        Self::new(0)
    }

    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    let delay = self.delay_for(attempt);
                    attempt += 1;
                    tracing::warn!(
                        operation = operation,
                        attempt = attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Provider unavailable, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay.saturating_mul(factor).min(MAX_DELAY)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}
