//! Bounded retry policy for route stitching.

use std::time::Duration;

use tg_core::RoutingConfig;

/// How many stitch attempts a refill may make, and how long to back off
/// after the routing service reports a rate limit.
///
/// Every failed attempt discards both endpoints; the next attempt samples a
/// fresh pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts:       u32,
    pub rate_limit_backoff: Duration,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, rate_limit_backoff: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), rate_limit_backoff }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_secs(config.rate_limit_backoff_secs),
        )
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}
