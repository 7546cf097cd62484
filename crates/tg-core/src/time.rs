//! Time model.
//!
//! # Design
//!
//! Timestamps are `chrono::DateTime<Utc>` everywhere.  Simulated time moves
//! forward in steps of a [`PacingInterval`]: the travel duration the routing
//! service reported for a segment, spread evenly over the segment's points.
//!
//!   pacing = segment_duration_secs / segment_coordinate_count
//!
//! Wall-clock waiting (real-time mode, rate-limit backoff) goes through the
//! [`Sleeper`] trait so tests can observe waits without sleeping.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::TimeDelta;

// ── PacingInterval ───────────────────────────────────────────────────────────

/// Seconds of simulated time assigned to each emitted point of a segment.
///
/// Only constructible from validated inputs: always finite and `>= 0`.
/// The default is zero.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
pub struct PacingInterval(f64);

impl PacingInterval {
    /// Derive the interval for a freshly stitched segment.
    ///
    /// Returns `None` for an empty segment or a negative / non-finite
    /// duration.
    pub fn from_segment(duration_secs: f64, coordinate_count: usize) -> Option<Self> {
        if coordinate_count == 0 {
            return None;
        }
        Self::from_secs(duration_secs / coordinate_count as f64)
    }

    /// Wrap a raw seconds value.  `None` if negative or non-finite.
    pub fn from_secs(secs: f64) -> Option<Self> {
        (secs.is_finite() && secs >= 0.0).then_some(Self(secs))
    }

    #[inline]
    pub fn secs(self) -> f64 {
        self.0
    }

    /// As a `std::time::Duration`, for wall-clock waits.  Saturates at
    /// `Duration::MAX`.
    #[inline]
    pub fn as_std(self) -> Duration {
        Duration::try_from_secs_f64(self.0).unwrap_or(Duration::MAX)
    }

    /// As a nanosecond-precision `chrono::TimeDelta`, for advancing a
    /// virtual clock.  `None` if out of chrono's range.
    pub fn as_delta(self) -> Option<TimeDelta> {
        TimeDelta::from_std(self.as_std()).ok()
    }
}

impl std::fmt::Display for PacingInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s/pt", self.0)
    }
}

// ── Day offsets ──────────────────────────────────────────────────────────────

/// Convert a (possibly fractional, possibly negative) day count into a
/// `TimeDelta`.  `None` if non-finite or out of chrono's range.
pub fn days_offset(days: f64) -> Option<TimeDelta> {
    if !days.is_finite() {
        return None;
    }
    let ms = days * 86_400_000.0;
    if ms.abs() >= i64::MAX as f64 {
        return None;
    }
    TimeDelta::try_milliseconds(ms.round() as i64)
}

// ── Sleeper ──────────────────────────────────────────────────────────────────

/// Blocking wall-clock wait and the monotonic clock it is measured against.
///
/// The engine never calls `std::thread::sleep` or `Instant::now` directly; it
/// goes through a `Sleeper` so the rate-limit backoff and the real-time
/// pacing can be driven on virtual time in tests.
pub trait Sleeper: Send + Sync {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration);
}

/// The production [`Sleeper`]: blocks the current thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    #[inline]
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for Arc<S> {
    #[inline]
    fn now(&self) -> Instant {
        (**self).now()
    }

    #[inline]
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// A [`Sleeper`] on virtual time: `sleep` returns immediately and moves
/// `now` forward by the requested amount.  Every wait is recorded.
///
/// Used by tests and by dry runs that must not block.
#[derive(Debug)]
pub struct VirtualSleeper {
    origin: Instant,
    waits:  parking_lot::Mutex<Vec<Duration>>,
}

impl VirtualSleeper {
    pub fn new() -> Self {
        Self { origin: Instant::now(), waits: parking_lot::Mutex::new(Vec::new()) }
    }

    /// All waits so far, in call order.
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().clone()
    }

    /// Sum of all waits.
    pub fn total(&self) -> Duration {
        self.waits.lock().iter().sum()
    }
}

impl Default for VirtualSleeper {
    fn default() -> Self {
        Self::new()
    }
}

impl Sleeper for VirtualSleeper {
    fn now(&self) -> Instant {
        self.origin + self.total()
    }

    fn sleep(&self, duration: Duration) {
        self.waits.lock().push(duration);
    }
}
