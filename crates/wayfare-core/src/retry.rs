//! Bounded retry with a fixed delay between attempts.
//!
//! Every failure is logged and swallowed until the attempt ceiling is reached.
//! Exhaustion is reported as [`Exhausted`], never as an empty success.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::Error;

const DEFAULT_TIMES: NonZeroU32 = NonZeroU32::new(3).unwrap();
const STARTUP_TIMES: NonZeroU32 = NonZeroU32::new(10).unwrap();

/// Attempt ceiling and inter-attempt delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    times: NonZeroU32,
    #[serde(with = "humantime_serde")]
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            times: DEFAULT_TIMES,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Create a policy; `times` must be at least one
    pub fn new(times: u32, delay: Duration) -> crate::Result<Self> {
        let times = NonZeroU32::new(times)
            .ok_or_else(|| Error::Config("retry attempts must be at least 1".to_string()))?;
        Ok(Self { times, delay })
    }

    /// Policy for waiting on the database at startup: 10 attempts, 2s apart.
    pub fn database_startup() -> Self {
        Self {
            times: STARTUP_TIMES,
            delay: Duration::from_secs(2),
        }
    }

    pub fn times(&self) -> u32 {
        self.times.get()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Every attempt failed
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl<E: fmt::Display> fmt::Display for Exhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "all {} attempts failed, last error: {}",
            self.attempts, self.last_error
        )
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Exhausted<E> {}

impl From<Exhausted<Error>> for Error {
    fn from(exhausted: Exhausted<Error>) -> Self {
        Error::RetriesExhausted {
            attempts: exhausted.attempts,
            source: Box::new(exhausted.last_error),
        }
    }
}

/// Run `operation` until it succeeds or `policy.times()` attempts have failed.
///
/// Sleeps `policy.delay()` between attempts, never after the last one.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, Exhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let times = policy.times();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(attempt, "Operation succeeded after retries");
                }
                return Ok(value);
            }
            Err(e) if attempt >= times => {
                tracing::error!(attempt, error = %e, "Attempt {} failed: {}", attempt, e);
                tracing::error!(attempts = times, "Giving up after {} attempts", times);
                return Err(Exhausted {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "Attempt {} failed: {}", attempt, e);
                tokio::time::sleep(policy.delay()).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::time::Instant;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.times(), 3);
        assert_eq!(policy.delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = RetryPolicy::new(0, Duration::from_secs(1));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_runs_exactly_times() {
        for times in 1..=5 {
            let policy = RetryPolicy::new(times, Duration::from_secs(2)).unwrap();
            let calls = Cell::new(0);
            let start = Instant::now();

            let result: Result<(), _> = retry(&policy, || {
                calls.set(calls.get() + 1);
                async { Err::<(), _>("boom") }
            })
            .await;

            let exhausted = result.unwrap_err();
            assert_eq!(exhausted.attempts, times);
            assert_eq!(exhausted.last_error, "boom");
            assert_eq!(calls.get(), times);
            // times - 1 delays
            assert_eq!(start.elapsed(), Duration::from_secs(2 * u64::from(times - 1)));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_third_attempt() {
        let policy = RetryPolicy::default();
        let calls = Cell::new(0);
        let start = Instant::now();

        let result = retry(&policy, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Err(format!("attempt {} failed", n))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_makes_no_further_attempts() {
        let policy = RetryPolicy::default();
        let calls = Cell::new(0);
        let start = Instant::now();

        let result = retry(&policy, || {
            calls.set(calls.get() + 1);
            async { Ok::<_, String>(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_exhausted_converts_to_error() {
        let err: Error = Exhausted {
            attempts: 3,
            last_error: Error::MissingField { field: "price" },
        }
        .into();

        assert!(matches!(err, Error::RetriesExhausted { attempts: 3, .. }));
        assert!(err.to_string().contains("3 attempts"));
    }

    #[test]
    fn test_policy_from_toml() {
        let policy: RetryPolicy = toml::from_str("times = 5\ndelay = \"500ms\"").unwrap();
        assert_eq!(policy.times(), 5);
        assert_eq!(policy.delay(), Duration::from_millis(500));

        assert!(toml::from_str::<RetryPolicy>("times = 0").is_err());
    }
}
