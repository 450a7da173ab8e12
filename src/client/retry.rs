//! Retry policy for transient overload
//!
//! The policy is injected into [`ApiClient`](super::ApiClient) rather than
//! hard-coded, so tests can run with zero-delay policies.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the delay grows between attempts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// Same delay before every retry
    Fixed,
    /// Delay grows by the base delay each retry
    Linear,
    /// Delay doubles each retry (default)
    #[default]
    Exponential,
}

impl std::str::FromStr for BackoffStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(BackoffStrategy::Fixed),
            "linear" => Ok(BackoffStrategy::Linear),
            "exponential" => Ok(BackoffStrategy::Exponential),
            _ => Err(format!(
                "Unknown backoff strategy '{s}'. Valid options: fixed, linear, exponential"
            )),
        }
    }
}

/// Bounded retry policy: a ceiling on attempts plus a backoff function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub strategy: BackoffStrategy,
    pub base_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        strategy: BackoffStrategy,
        base_delay: Duration,
        max_delay: Duration,
    ) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            strategy,
            base_delay,
            max_delay,
        }
    }

    /// A policy that retries without sleeping. Intended for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        RetryPolicy::new(
            max_attempts,
            BackoffStrategy::Fixed,
            Duration::ZERO,
            Duration::ZERO,
        )
    }

    /// A policy that never retries
    pub fn no_retry() -> Self {
        RetryPolicy::immediate(1)
    }

    /// Whether another attempt may follow the given (1-based) attempt.
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let retry = attempt.saturating_sub(1);
        let delay = match self.strategy {
            BackoffStrategy::Fixed => self.base_delay,
            BackoffStrategy::Linear => self.base_delay.saturating_mul(retry.saturating_add(1)),
            BackoffStrategy::Exponential => self
                .base_delay
                .saturating_mul(2u32.saturating_pow(retry.min(31))),
        };
        delay.min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    /// Default: 6 attempts, exponential backoff from 250ms, capped at 10s.
    fn default() -> Self {
        RetryPolicy::new(
            6,
            BackoffStrategy::Exponential,
            Duration::from_millis(250),
            Duration::from_secs(10),
        )
    }
}
