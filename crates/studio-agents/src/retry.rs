//! Generic exponential-backoff retry helper shared by the generation
//! agents: doubles the delay after every failed attempt.

use std::future::Future;
use std::time::Duration;

use studio_core::{StudioError, StudioResult};

/// Calls `attempt` up to `attempts` times, sleeping
/// `initial_delay * 2^n` between failures. Returns the first success, or
/// the last failure wrapped as [`StudioError::ProviderFailure`].
pub async fn retry_with_backoff<T, F, Fut>(
    attempts: u32,
    initial_delay: Duration,
    mut attempt: F,
) -> StudioResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = StudioResult<T>>,
{
    let mut last_err = None;
    for n in 0..attempts {
        match attempt(n).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::warn!(attempt = n, error = %err, "generation attempt failed");
                last_err = Some(err);
                if n + 1 < attempts {
                    let delay = initial_delay * 2u32.pow(n);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    Err(StudioError::ProviderFailure(
        last_err.map(|e| e.to_string()).unwrap_or_else(|| "no attempts made".to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_on_first_try_without_sleeping() {
        let result = retry_with_backoff(3, Duration::from_millis(1), |_| async { Ok::<_, StudioError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(3, Duration::from_millis(1), |n| {
            let calls = &calls;
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(StudioError::ProviderError("transient".to_string()))
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_attempts_and_returns_provider_failure() {
        let result: StudioResult<i32> =
            retry_with_backoff(2, Duration::from_millis(1), |_| async { Err(StudioError::ProviderError("down".to_string())) })
                .await;
        assert!(matches!(result, Err(StudioError::ProviderFailure(_))));
    }
}
