use std::{future::Future, time::Duration};

use tokio::time::sleep;
use tracing::warn;

use crate::error::SubmitError;

/// How a bounded retry loop ended.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    Success { value: T, attempts: usize },
    /// Stopped at the first error that was not a revert.
    NonRetryable { error: SubmitError, attempts: usize },
    /// Every attempt reverted.
    RetriesExhausted {
        attempts: usize,
        last_error: Option<SubmitError>,
    },
}

impl<T> RetryOutcome<T> {
    pub fn attempts(&self) -> usize {
        match self {
            Self::Success { attempts, .. }
            | Self::NonRetryable { attempts, .. }
            | Self::RetriesExhausted { attempts, .. } => *attempts,
        }
    }
}

/// Runs `op` up to `attempts` times, sleeping a fixed `delay` after each revert.
///
/// Only [`SubmitError::is_revert`] failures are retried; anything else ends the loop at
/// once. `op` receives the 1-based attempt number.
pub async fn retry_on_revert<F, Fut, T>(
    mut op: F,
    attempts: usize,
    delay: Duration,
) -> RetryOutcome<T>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, SubmitError>>,
{
    let mut last_error = None;

    for attempt in 1..=attempts {
        match op(attempt).await {
            Ok(value) => {
                return RetryOutcome::Success {
                    value,
                    attempts: attempt,
                }
            }
            Err(err) if err.is_revert() => {
                warn!(attempt, error = %err, "transaction failed");
                last_error = Some(err);
                if attempt < attempts {
                    sleep(delay).await;
                }
            }
            Err(error) => {
                return RetryOutcome::NonRetryable {
                    error,
                    attempts: attempt,
                }
            }
        }
    }

    RetryOutcome::RetriesExhausted {
        attempts,
        last_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn retries_reverts_until_success() {
        let counter = AtomicUsize::new(0);
        let res = retry_on_revert(
            |_| {
                let current = counter.fetch_add(1, Ordering::Relaxed);
                async move {
                    if current < 2 {
                        Err(SubmitError::reverted("execution reverted"))
                    } else {
                        Ok(7)
                    }
                }
            },
            5,
            Duration::from_millis(1),
        )
        .await;

        assert!(matches!(res, RetryOutcome::Success { value: 7, attempts: 3 }));
        assert_eq!(counter.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn gives_up_after_cap() {
        let counter = AtomicUsize::new(0);
        let res: RetryOutcome<()> = retry_on_revert(
            |_| {
                counter.fetch_add(1, Ordering::Relaxed);
                async { Err(SubmitError::reverted("execution reverted")) }
            },
            5,
            Duration::ZERO,
        )
        .await;

        assert!(matches!(
            res,
            RetryOutcome::RetriesExhausted {
                attempts: 5,
                last_error: Some(_)
            }
        ));
        assert_eq!(counter.load(Ordering::Relaxed), 5);
    }

    #[tokio::test]
    async fn stops_on_non_revert() {
        let counter = AtomicUsize::new(0);
        let res: RetryOutcome<()> = retry_on_revert(
            |_| {
                counter.fetch_add(1, Ordering::Relaxed);
                async { Err(SubmitError::transport("nonce too low")) }
            },
            5,
            Duration::ZERO,
        )
        .await;

        assert_eq!(res.attempts(), 1);
        assert!(matches!(res, RetryOutcome::NonRetryable { .. }));
        assert_eq!(counter.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn waits_between_reverts_but_not_after_the_last() {
        let delay = Duration::from_millis(20);
        let started = std::time::Instant::now();
        let res: RetryOutcome<()> = retry_on_revert(
            |_| async { Err(SubmitError::reverted("execution reverted")) },
            3,
            delay,
        )
        .await;

        assert_eq!(res.attempts(), 3);
        assert!(started.elapsed() >= delay * 2);
    }

    #[tokio::test]
    async fn passes_attempt_number() {
        let mut seen = Vec::new();
        let _: RetryOutcome<()> = retry_on_revert(
            |attempt| {
                seen.push(attempt);
                async { Err(SubmitError::reverted("execution reverted")) }
            },
            3,
            Duration::ZERO,
        )
        .await;
        assert_eq!(seen, [1, 2, 3]);
    }
}
