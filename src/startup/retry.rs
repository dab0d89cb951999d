//! Fixed-delay retry for startup fetches.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

/// Delay between attempts when none is configured.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Total attempts (first try plus three retries) when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Fixed-delay, bounded retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    delay: Duration,
    max_attempts: u32,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` counts the first attempt and is
    /// clamped to at least 1.
    pub fn new(delay: Duration, max_attempts: u32) -> Self {
        Self {
            delay,
            max_attempts: max_attempts.max(1),
        }
    }

    /// A single attempt, no retries.
    pub fn once() -> Self {
        Self::new(Duration::ZERO, 1)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            DEFAULT_MAX_ATTEMPTS,
        )
    }
}

/// Progress notifications emitted by [`retry_fixed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryEvent {
    /// Attempt `n` (1-based) is about to start
    Attempt(u32),
    /// Attempt `n` failed and the loop is sleeping before the next one
    Waiting(u32),
}

/// The last error once every attempt has failed.
#[derive(Debug)]
pub struct RetryExhausted {
    pub attempts: u32,
    pub last_error: anyhow::Error,
}

/// Run `op` until it succeeds or `policy.max_attempts()` attempts have failed,
/// sleeping `policy.delay()` between attempts.
pub async fn retry_fixed<T, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut on_event: impl FnMut(RetryEvent),
    mut op: F,
) -> Result<T, RetryExhausted>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut attempt = 1;
    loop {
        on_event(RetryEvent::Attempt(attempt));
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts => {
                debug!(
                    "{} failed: {:#}; retrying in {:?} (attempt {}/{})",
                    label, err, policy.delay, attempt, policy.max_attempts
                );
                on_event(RetryEvent::Waiting(attempt));
                sleep(policy.delay).await;
                attempt += 1;
            }
            Err(err) => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: err,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_policy_clamps_attempts() {
        let policy = RetryPolicy::new(Duration::from_millis(10), 0);
        assert_eq!(policy.max_attempts(), 1);

        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(), Duration::from_millis(500));
        assert_eq!(policy.max_attempts(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_failures() {
        let calls = &AtomicU32::new(0);
        let mut events = Vec::new();

        let result = retry_fixed(
            RetryPolicy::new(Duration::from_millis(500), 3),
            "fetch",
            |event| events.push(event),
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    anyhow::bail!("unavailable")
                }
                Ok(n)
            },
        )
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            events,
            vec![
                RetryEvent::Attempt(1),
                RetryEvent::Waiting(1),
                RetryEvent::Attempt(2),
                RetryEvent::Waiting(2),
                RetryEvent::Attempt(3),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_keeps_last_error() {
        let calls = &AtomicU32::new(0);

        let result: Result<(), _> = retry_fixed(
            RetryPolicy::new(Duration::from_millis(100), 2),
            "fetch",
            |_| {},
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                anyhow::bail!("failure #{}", n)
            },
        )
        .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 2);
        assert_eq!(exhausted.last_error.to_string(), "failure #2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
