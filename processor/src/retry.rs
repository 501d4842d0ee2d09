//! Bounded retry with a fixed backoff and a per-attempt timeout.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, timeout};

#[derive(Error, Debug)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: E },

    #[error("gave up after {attempts} attempts, last attempt timed out")]
    TimedOut { attempts: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration, attempt_timeout: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
            attempt_timeout,
        }
    }

    /// Run `op` until it succeeds or `max_attempts` attempts have failed.
    /// Each attempt is aborted after `attempt_timeout`; failed attempts are
    /// separated by `backoff`.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_timed_out = false;
        let mut last_error = None;

        for attempt in 1..=attempts {
            match timeout(self.attempt_timeout, op()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(error)) => {
                    last_timed_out = false;
                    last_error = Some(error);
                }
                Err(_elapsed) => {
                    last_timed_out = true;
                    last_error = None;
                }
            }
            if attempt < attempts {
                sleep(self.backoff).await;
            }
        }

        match last_error {
            Some(source) if !last_timed_out => Err(RetryError::Exhausted { attempts, source }),
            _ => Err(RetryError::TimedOut { attempts }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(
            max_attempts,
            Duration::from_millis(5),
            Duration::from_millis(50),
        )
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, RetryError<&str>> = quick_policy(3)
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, RetryError<&str>> = quick_policy(3)
            .run(|| {
                let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if attempt < 3 {
                        Err("not yet")
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_and_reports_last_error() {
        let result: Result<u32, RetryError<&str>> =
            quick_policy(2).run(|| async { Err("down") }).await;
        match result {
            Err(RetryError::Exhausted { attempts, source }) => {
                assert_eq!(attempts, 2);
                assert_eq!(source, "down");
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_attempts_are_aborted() {
        let policy = RetryPolicy::new(
            2,
            Duration::from_millis(1),
            Duration::from_millis(10),
        );
        let result: Result<u32, RetryError<&str>> = policy
            .run(|| async {
                sleep(Duration::from_secs(5)).await;
                Ok(1)
            })
            .await;
        assert!(matches!(result, Err(RetryError::TimedOut { attempts: 2 })));
    }
}
