//! Bounded retry with an explicit backoff policy.
//!
//! The connection provider retries transient failures through [`retry`]. The
//! policy is plain data, so callers pick attempts and pauses per use site
//! (long at startup, short per request) and tests run with a zero delay.

use std::fmt::Display;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TaskError;

/// How the pause between attempts grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// Same pause after every failure
    #[default]
    Fixed,
    /// Pause grows by the base delay each attempt
    Linear,
    /// Pause doubles each attempt
    Exponential,
}

impl FromStr for Backoff {
    type Err = TaskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "linear" => Ok(Self::Linear),
            "exponential" => Ok(Self::Exponential),
            other => Err(TaskError::Configuration(format!(
                "Unknown backoff '{other}'. Must be one of: fixed, linear, exponential"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Backoff {
    /// Same rules as [`FromStr`], so config values are case-insensitive
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Backoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backoff::Fixed => write!(f, "fixed"),
            Backoff::Linear => write!(f, "linear"),
            Backoff::Exponential => write!(f, "exponential"),
        }
    }
}

/// Attempts, base delay and backoff for a retried operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(10, Duration::from_secs(2))
    }
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` is clamped to at least one
    pub fn new(max_attempts: u32, delay: Duration, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            backoff,
        }
    }

    /// Constant pause between attempts
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self::new(max_attempts, delay, Backoff::Fixed)
    }

    /// Single attempt, no retry
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Backoff::Fixed)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Pause to wait after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Linear => self.delay.saturating_mul(attempt),
            Backoff::Exponential => {
                let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
                self.delay.saturating_mul(factor)
            }
        }
    }
}

/// Why a retried operation gave up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The failure was not transient, so no retry was attempted
    Permanent(E),
    /// Every attempt failed with a transient error; holds the last one
    Exhausted { attempts: u32, last_error: E },
}

impl<E> RetryError<E> {
    /// The underlying error, whichever way the retry ended
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Permanent(error) => error,
            RetryError::Exhausted { last_error, .. } => last_error,
        }
    }
}

/// Run `operation` until it succeeds, fails permanently, or runs out of attempts.
///
/// `operation` receives the 1-based attempt number. Each transient failure is
/// logged with its attempt number before sleeping for
/// [`RetryPolicy::delay_for`].
pub async fn retry<T, E, Op, Fut, P>(
    policy: &RetryPolicy,
    mut is_transient: P,
    mut operation: Op,
) -> Result<T, RetryError<E>>
where
    E: Display,
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut(&E) -> bool,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if !is_transient(&error) => return Err(RetryError::Permanent(error)),
            Err(error) if attempt >= max_attempts => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last_error: error,
                });
            }
            Err(error) => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Transient failure, retrying"
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_backoff_deserializes_case_insensitively() {
        let backoff: Backoff = serde_json::from_str("\"Linear\"").unwrap();
        assert_eq!(backoff, Backoff::Linear);

        let backoff: Backoff = serde_json::from_str("\" EXPONENTIAL \"").unwrap();
        assert_eq!(backoff, Backoff::Exponential);

        let error = serde_json::from_str::<Backoff>("\"random\"").unwrap_err();
        assert!(error.to_string().contains("Unknown backoff"));

        assert_eq!(serde_json::to_string(&Backoff::Fixed).unwrap(), "\"fixed\"");
    }

    #[test]
    fn test_policy_clamps_attempts() {
        let policy = RetryPolicy::fixed(0, Duration::from_millis(5));
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
    }

    #[test]
    fn test_delay_for_each_backoff() {
        let base = Duration::from_millis(100);

        let fixed = RetryPolicy::new(5, base, Backoff::Fixed);
        assert_eq!(fixed.delay_for(1), base);
        assert_eq!(fixed.delay_for(4), base);

        let linear = RetryPolicy::new(5, base, Backoff::Linear);
        assert_eq!(linear.delay_for(1), Duration::from_millis(100));
        assert_eq!(linear.delay_for(3), Duration::from_millis(300));

        let exponential = RetryPolicy::new(5, base, Backoff::Exponential);
        assert_eq!(exponential.delay_for(1), Duration::from_millis(100));
        assert_eq!(exponential.delay_for(2), Duration::from_millis(200));
        assert_eq!(exponential.delay_for(4), Duration::from_millis(800));
    }

    #[test]
    fn test_exponential_delay_saturates() {
        let policy = RetryPolicy::new(100, Duration::from_secs(1), Backoff::Exponential);
        assert!(policy.delay_for(64) >= policy.delay_for(32));
    }

    #[test]
    fn test_backoff_from_str() {
        assert_eq!("fixed".parse::<Backoff>().unwrap(), Backoff::Fixed);
        assert_eq!("Linear".parse::<Backoff>().unwrap(), Backoff::Linear);
        assert_eq!(" EXPONENTIAL ".parse::<Backoff>().unwrap(), Backoff::Exponential);
        assert!("random".parse::<Backoff>().unwrap_err().is_configuration());
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_transient_failures() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::fixed(5, Duration::ZERO);

        let result: Result<&str, RetryError<String>> = retry(
            &policy,
            |_| true,
            |attempt| {
                calls.set(calls.get() + 1);
                async move {
                    if attempt < 3 {
                        Err(format!("attempt {attempt} refused"))
                    } else {
                        Ok("connected")
                    }
                }
            },
        )
        .await;

        assert_eq!(result.unwrap(), "connected");
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausts_and_surfaces_last_error() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::fixed(4, Duration::ZERO);

        let result: Result<(), RetryError<String>> = retry(
            &policy,
            |_| true,
            |attempt| {
                calls.set(calls.get() + 1);
                async move { Err(format!("failure {attempt}")) }
            },
        )
        .await;

        assert_eq!(
            result.unwrap_err(),
            RetryError::Exhausted {
                attempts: 4,
                last_error: "failure 4".to_string()
            }
        );
        assert_eq!(calls.get(), 4);
    }

    #[tokio::test]
    async fn test_retry_stops_on_permanent_error() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::fixed(10, Duration::ZERO);

        let result: Result<(), RetryError<String>> = retry(
            &policy,
            |error: &String| error.contains("transient"),
            |_| {
                calls.set(calls.get() + 1);
                async { Err("bad credentials".to_string()) }
            },
        )
        .await;

        assert_eq!(result.unwrap_err(), RetryError::Permanent("bad credentials".to_string()));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_policy_does_not_retry() {
        let calls = Cell::new(0);

        let result: Result<(), RetryError<String>> = retry(
            &RetryPolicy::none(),
            |_| true,
            |_| {
                calls.set(calls.get() + 1);
                async { Err("down".to_string()) }
            },
        )
        .await;

        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 1, .. })));
        assert_eq!(calls.get(), 1);
    }
}
