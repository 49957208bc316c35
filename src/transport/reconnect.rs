//! Reconnect scheduling
//!
//! `Reconnector` is the reconnect flag plus an attempt counter. It is
//! plain synchronous state: the session task feeds it events and acts
//! on the returned `ReconnectDecision`.
//!
//! Event sequence for a dropped connection:
//! ```text
//! error  -> on_failure() -> Schedule(delay)
//! close  -> on_failure() -> AlreadyPending      (same socket, ignored)
//! timer  -> begin_attempt()                     (flag cleared)
//! fail   -> on_failure() -> Schedule(delay')    (next attempt)
//! open   -> on_open()                           (counter reset)
//! ```

use crate::constants::{MAX_RECONNECT_DELAY_MS, RECONNECT_DELAY_MS};
use std::time::Duration;

/// When and how often to retry a lost connection
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    /// Delay before the first attempt
    pub delay: Duration,
    /// Multiplier applied per consecutive failed attempt (1.0 = fixed delay)
    pub backoff_factor: f64,
    /// Upper bound for the backed-off delay
    pub max_delay: Duration,
    /// Give up after this many consecutive attempts; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(RECONNECT_DELAY_MS),
            backoff_factor: 1.0,
            max_delay: Duration::from_millis(MAX_RECONNECT_DELAY_MS),
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    /// Fixed delay, unlimited attempts
    pub fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            max_delay: delay.max(Duration::from_millis(MAX_RECONNECT_DELAY_MS)),
            ..Self::default()
        }
    }

    /// Delay before attempt number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.backoff_factor <= 1.0 || attempt == 0 {
            return self.delay.min(self.max_delay);
        }
        let exponent = attempt.min(i32::MAX as u32) as i32;
        let scaled = self.delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        if !scaled.is_finite() || scaled >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(scaled)
    }
}

/// What the session should do after a failure event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Start a new attempt after this delay
    Schedule(Duration),
    /// An attempt is already scheduled; ignore this event
    AlreadyPending,
    /// `max_attempts` reached; stop retrying
    GiveUp,
}

/// Reconnect flag and attempt bookkeeping for one session
#[derive(Debug)]
pub struct Reconnector {
    policy: ReconnectPolicy,
    pending: bool,
    attempts: u32,
}

impl Reconnector {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            pending: false,
            attempts: 0,
        }
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    /// Consecutive attempts since the last successful open
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// An error or close event was observed
    pub fn on_failure(&mut self) -> ReconnectDecision {
        if self.pending {
            return ReconnectDecision::AlreadyPending;
        }
        if let Some(max) = self.policy.max_attempts {
            if self.attempts >= max {
                return ReconnectDecision::GiveUp;
            }
        }
        self.pending = true;
        ReconnectDecision::Schedule(self.policy.delay_for(self.attempts))
    }

    /// Delay of the attempt currently scheduled
    ///
    /// The counter only moves in `begin_attempt`, so this matches the
    /// delay `on_failure` returned with `Schedule`.
    pub fn pending_delay(&self) -> Duration {
        self.policy.delay_for(self.attempts)
    }

    /// The scheduled delay elapsed and a new connection attempt starts
    pub fn begin_attempt(&mut self) {
        self.pending = false;
        self.attempts = self.attempts.saturating_add(1);
    }

    /// The connection opened
    pub fn on_open(&mut self) {
        self.pending = false;
        self.attempts = 0;
    }
}
