use super::Capability;
use crate::config::RetryConfig;
use crate::contract::{Contract, FactSet, TaskDescription};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Execute an async operation with jittered exponential backoff
pub async fn retry_with_backoff<F, Fut, T, E>(
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempts = 0;
    let mut backoff_ms = config.backoff_base_ms;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempts >= config.max_attempts => {
                if attempts > 1 {
                    warn!("All {} attempts failed: {}", attempts, e);
                }
                return Err(e);
            }
            Err(e) => {
                let delay = backoff_delay(backoff_ms, config.backoff_base_ms);

                warn!(
                    "Attempt {} failed: {}. Retrying in {:?}...",
                    attempts, e, delay
                );

                sleep(delay).await;
                backoff_ms = backoff_ms.saturating_mul(2);
            }
        }
    }
}

/// Jittered backoff: base * 2^attempt + random(0..base), saturating
fn backoff_delay(backoff_ms: u64, base_ms: u64) -> Duration {
    let jitter = rand::random::<u64>() % base_ms.max(1);
    Duration::from_millis(backoff_ms.saturating_add(jitter))
}

/// Retries the wrapped capability. Lives below the pipeline: stages see a
/// single call that either conforms or fails.
pub struct Retrying {
    inner: Arc<dyn Capability>,
    config: RetryConfig,
}

impl Retrying {
    pub fn new(inner: Arc<dyn Capability>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl Capability for Retrying {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn invoke(
        &self,
        task: &TaskDescription,
        contract: &Contract,
        facts: &FactSet,
    ) -> Result<Value, ProviderError> {
        retry_with_backoff(&self.config, || self.inner.invoke(task, contract, facts)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let config = RetryConfig {
            max_attempts: 3,
            backoff_base_ms: 10,
        };

        let result: Result<i32, &str> = retry_with_backoff(&config, || async { Ok(42) }).await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retry_success_after_failures() {
        let config = RetryConfig {
            max_attempts: 3,
            backoff_base_ms: 10,
        };

        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result: Result<i32, &str> = retry_with_backoff(&config, || {
            let attempts = attempts_clone.clone();
            async move {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err("not yet")
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_single_attempt_passes_failure_through() {
        let config = RetryConfig {
            max_attempts: 1,
            backoff_base_ms: 0,
        };

        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result: Result<i32, &str> = retry_with_backoff(&config, || {
            let attempts = attempts_clone.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err("upstream timeout")
            }
        })
        .await;

        assert_eq!(result.unwrap_err(), "upstream timeout");
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_delay_saturates() {
        assert_eq!(backoff_delay(u64::MAX, 1000), Duration::from_millis(u64::MAX));

        let delay = backoff_delay(4000, 1000);
        assert!(delay >= Duration::from_millis(4000));
        assert!(delay < Duration::from_millis(5000));
    }
}
