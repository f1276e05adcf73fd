//! Reconnect schedule for the live socket.
//!
//! Delays double from `base` per consecutive failure, are capped at
//! `max_delay`, and carry ±25 % jitter so several clients restarting together
//! do not reconnect in lockstep.

use std::time::Duration;

use nightwalk_core::AppConfig;

/// Floor applied to every reconnect sleep, whatever the configured base.
pub const MIN_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base: Duration,
    pub max_delay: Duration,
    /// Consecutive failed attempts allowed before giving up; `0` never gives up.
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(5_000),
            max_delay: Duration::from_millis(60_000),
            max_attempts: 10,
        }
    }
}

impl ReconnectPolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base: Duration::from_millis(config.reconnect_base_ms),
            max_delay: Duration::from_millis(config.reconnect_max_delay_ms),
            max_attempts: config.reconnect_max_attempts,
        }
    }

    /// Un-jittered delay before reconnect `attempt` (1-based).
    #[must_use]
    pub fn nominal_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(10);
        self.base
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    /// Jittered delay before reconnect `attempt`, never above `max_delay`
    /// and never below [`MIN_DELAY`].
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = rand::random::<f64>() * 0.5 + 0.75;
        self.nominal_delay(attempt)
            .mul_f64(factor)
            .min(self.max_delay)
            .max(MIN_DELAY)
    }

    #[must_use]
    pub fn is_exhausted(&self, attempt: u32) -> bool {
        self.max_attempts != 0 && attempt > self.max_attempts
    }
}
