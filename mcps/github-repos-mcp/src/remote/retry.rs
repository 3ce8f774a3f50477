//! Retry budgets and exponential backoff for GitHub calls

use std::time::Duration;

use crate::config::RetryConfig;

/// How the client retries rate-limited and failing requests.
///
/// Rate limiting (429 or an exhausted quota) and server errors (5xx,
/// unreachable host) draw from separate budgets. Both use the same
/// exponential schedule: `base * 2^n`, capped at `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_rate_limit_retries: u32,
    pub max_server_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Never retry; every failure surfaces immediately
    pub fn none() -> Self {
        Self {
            max_rate_limit_retries: 0,
            max_server_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (zero-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// The first `retries` delays, in the order they are applied
    pub fn schedule(&self, retries: u32) -> impl Iterator<Item = Duration> + '_ {
        (0..retries).map(|n| self.delay_for(n))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_rate_limit_retries: config.max_rate_limit_retries,
            max_server_retries: config.max_server_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms.max(config.base_delay_ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(base_ms: u64, max_ms: u64) -> RetryPolicy {
        RetryPolicy {
            max_rate_limit_retries: 5,
            max_server_retries: 2,
            base_delay: Duration::from_millis(base_ms),
            max_delay: Duration::from_millis(max_ms),
        }
    }

    #[test]
    fn test_schedule_doubles() {
        let p = policy(100, 10_000);
        let delays: Vec<u128> = p.schedule(4).map(|d| d.as_millis()).collect();
        assert_eq!(delays, vec![100, 200, 400, 800]);
    }

    #[test]
    fn test_schedule_is_capped() {
        let p = policy(1_000, 3_000);
        let delays: Vec<u128> = p.schedule(4).map(|d| d.as_millis()).collect();
        assert_eq!(delays, vec![1_000, 2_000, 3_000, 3_000]);
    }

    #[test]
    fn test_huge_retry_number_saturates() {
        let p = policy(500, 30_000);
        assert_eq!(p.delay_for(64), Duration::from_millis(30_000));
    }

    #[test]
    fn test_from_config() {
        let config = RetryConfig {
            max_rate_limit_retries: 3,
            max_server_retries: 1,
            base_delay_ms: 250,
            max_delay_ms: 100,
        };
        let p = RetryPolicy::from(&config);
        assert_eq!(p.max_rate_limit_retries, 3);
        // cap never sits below the base delay
        assert_eq!(p.max_delay, Duration::from_millis(250));
    }
}
