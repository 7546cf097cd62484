//! Clock sources.
//!
//! One engine serves every run mode; only the clock differs.
//!
//! | Mode       | Clock          | Timestamp                 | Between points          |
//! |------------|----------------|---------------------------|-------------------------|
//! | `Batch`    | `VirtualClock` | start + sum of pacing     | nothing (as fast as possible) |
//! | `Offset`   | `VirtualClock` | now + days, then as batch | nothing                 |
//! | `Realtime` | `WallClock`    | start + time slept        | wait pacing, in poll ticks |

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};

use tg_core::{PacingInterval, Sleeper, days_offset};

use crate::{EngineError, EngineResult};

// ── Clock trait ───────────────────────────────────────────────────────────────

/// Source of point timestamps.
pub trait Clock: Send {
    /// Timestamp for the point about to be emitted.
    fn now(&self) -> DateTime<Utc>;

    /// Move past one emitted point.  Fails if time would leave chrono's
    /// range.
    fn advance(&mut self, pacing: PacingInterval) -> EngineResult<()>;
}

// ── VirtualClock ──────────────────────────────────────────────────────────────

/// Simulated time: advancing is instantaneous.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VirtualClock {
    now: DateTime<Utc>,
}

impl VirtualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: start }
    }
}

impl Clock for VirtualClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn advance(&mut self, pacing: PacingInterval) -> EngineResult<()> {
        self.now = pacing
            .as_delta()
            .and_then(|d| self.now.checked_add_signed(d))
            .ok_or_else(|| EngineError::Config(format!("clock overflow advancing {} by {pacing}", self.now)))?;
        Ok(())
    }
}

// ── WallClock ─────────────────────────────────────────────────────────────────

/// Real time: timestamps follow the [`Sleeper`]'s monotonic clock from a
/// fixed start.  Advancing blocks the thread.
///
/// Waits have the resolution of one poll tick: a pacing interval is rounded
/// *up* to a whole number of ticks, and never waits less than one tick.
pub struct WallClock {
    start:     DateTime<Utc>,
    origin:    Instant,
    poll_tick: Duration,
    sleeper:   Arc<dyn Sleeper>,
}

impl WallClock {
    /// `start` is the timestamp of the first point: the wall clock at
    /// launch, shifted by any day offset.
    pub fn new(start: DateTime<Utc>, poll_tick: Duration, sleeper: Arc<dyn Sleeper>) -> Self {
        let origin = sleeper.now();
        Self { start, origin, poll_tick, sleeper }
    }
}

impl Clock for WallClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = self.sleeper.now().saturating_duration_since(self.origin);
        TimeDelta::from_std(elapsed)
            .ok()
            .and_then(|d| self.start.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn advance(&mut self, pacing: PacingInterval) -> EngineResult<()> {
        self.sleeper.sleep(round_up_to_ticks(pacing.as_std(), self.poll_tick));
        Ok(())
    }
}

/// `wait` rounded up to a whole number of `tick`s, at least one tick.
///
/// A zero `tick` disables rounding.
pub fn round_up_to_ticks(wait: Duration, tick: Duration) -> Duration {
    if tick.is_zero() {
        return wait;
    }
    let ticks = wait.as_nanos().div_ceil(tick.as_nanos()).max(1);
    let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
    tick.saturating_mul(ticks)
}

// ── RunMode ───────────────────────────────────────────────────────────────────

/// How timestamps are produced and when a run ends.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RunMode {
    /// Virtual clock from `start`; ends after the requested rides.
    Batch { start: DateTime<Utc> },

    /// Virtual clock from `now + days`; negative days generate history.
    /// Ends after the requested rides.
    Offset { days: f64 },

    /// Wall-clock timestamps shifted by `offset_days`, real waits between
    /// points.  Never ends on its own.
    Realtime { offset_days: f64 },
}

impl RunMode {
    /// Batch mode starting at invocation time.
    pub fn batch_now() -> Self {
        RunMode::Batch { start: Utc::now() }
    }

    /// First timestamp of a run started at `now`.  `None` if a day offset
    /// is out of range.
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match *self {
            RunMode::Batch { start } => Some(start),
            RunMode::Offset { days } | RunMode::Realtime { offset_days: days } => {
                now.checked_add_signed(days_offset(days)?)
            }
        }
    }

    #[inline]
    pub fn is_realtime(&self) -> bool {
        matches!(self, RunMode::Realtime { .. })
    }
}
