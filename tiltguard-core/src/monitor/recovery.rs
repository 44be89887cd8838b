//! Sensor re-initialization backoff
//!
//! After `failure_threshold` consecutive failed reads the monitor tries to
//! bring the sensor up again. Each failed attempt doubles the number of
//! ticks skipped before the next one, up to `max_backoff_ticks`. A good
//! read or a successful attempt starts over from scratch.

use crate::config::RecoveryPolicy;

/// Tracks failed reads and when the next re-init attempt is due
#[derive(Debug, Clone)]
pub struct RecoveryTracker {
    policy: RecoveryPolicy,
    consecutive_failures: u32,
    /// Current backoff step in ticks (0 before the first failed attempt)
    backoff_ticks: u32,
    /// Ticks left to skip before the next attempt
    wait_ticks: u32,
}

impl RecoveryTracker {
    pub fn new(policy: RecoveryPolicy) -> Self {
        Self {
            policy,
            consecutive_failures: 0,
            backoff_ticks: 0,
            wait_ticks: 0,
        }
    }

    /// A read succeeded
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.backoff_ticks = 0;
        self.wait_ticks = 0;
    }

    /// A read failed; returns true when a re-init should be attempted now
    pub fn record_failure(&mut self) -> bool {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        if !self.policy.is_enabled() || self.consecutive_failures < self.policy.failure_threshold {
            return false;
        }

        if self.wait_ticks > 0 {
            self.wait_ticks -= 1;
            return false;
        }

        true
    }

    /// Report the result of a re-init attempt
    pub fn record_attempt(&mut self, recovered: bool) {
        if recovered {
            self.record_success();
            return;
        }

        self.backoff_ticks = if self.backoff_ticks == 0 {
            1
        } else {
            self.backoff_ticks
                .saturating_mul(2)
                .min(self.policy.max_backoff_ticks)
        };
        self.wait_ticks = self.backoff_ticks;
    }

    /// Failed reads since the last success
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Ticks that will be skipped after the last failed attempt
    pub fn backoff_ticks(&self) -> u32 {
        self.backoff_ticks
    }
}
