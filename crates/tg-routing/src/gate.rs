//! Rate-limit backoff shared by every engine talking to one routing service.
//!
//! The routing service limits requests per API key, not per vehicle.  When
//! any engine sees a 429 it closes the gate for the backoff window; every
//! engine waits at the gate before its next call.  A single-vehicle run gets
//! the same behavior with a private gate.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use tg_core::Sleeper;

/// Shared "no routing calls before this instant" marker.
///
/// Wrap in an `Arc` to share across engines.
#[derive(Debug, Default)]
pub struct RateLimitGate {
    blocked_until: Mutex<Option<Instant>>,
}

impl RateLimitGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forbid routing calls for `window` from now.  Never shortens an
    /// existing closure.
    pub fn close_for(&self, window: Duration, sleeper: &dyn Sleeper) {
        let until = sleeper.now() + window;
        let mut guard = self.blocked_until.lock();
        *guard = Some(guard.map_or(until, |prev| prev.max(until)));
    }

    /// Time left until the gate reopens, if it is closed.
    pub fn remaining(&self, sleeper: &dyn Sleeper) -> Option<Duration> {
        let until = (*self.blocked_until.lock())?;
        let left = until.saturating_duration_since(sleeper.now());
        (!left.is_zero()).then_some(left)
    }

    /// Block until the gate is open.  Returns how long this call waited.
    pub fn wait(&self, sleeper: &dyn Sleeper) -> Duration {
        let Some(until) = *self.blocked_until.lock() else {
            return Duration::ZERO;
        };
        let left = until.saturating_duration_since(sleeper.now());
        if !left.is_zero() {
            log::info!("routing rate-limited; waiting {:.1}s", left.as_secs_f64());
            sleeper.sleep(left);
        }
        // Reopen unless another engine extended the closure meanwhile.
        let mut guard = self.blocked_until.lock();
        if *guard == Some(until) {
            *guard = None;
        }
        left
    }
}
