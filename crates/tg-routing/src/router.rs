//! Routing trait and the segment it produces.
//!
//! # Pluggability
//!
//! The engine calls routing via the [`Router`] trait, so the HTTP client can
//! be replaced by a scripted router in tests or by a local routing engine.

use std::sync::Arc;

use tg_core::{Coordinate, PacingInterval};

use crate::RoutingResult;

// ── Segment ──────────────────────────────────────────────────────────────────

/// One routed path between two sampled points.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Road-following coordinates, in travel order.  Never empty.
    pub coordinates: Vec<Coordinate>,
    /// Travel time the service reported for the whole path.
    pub duration_secs: f64,
}

impl Segment {
    #[inline]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// `duration / coordinate count`; `None` for an empty segment.
    pub fn pacing(&self) -> Option<PacingInterval> {
        PacingInterval::from_segment(self.duration_secs, self.coordinates.len())
    }
}

// ── Router trait ─────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can serve every
/// engine of a fleet.
pub trait Router: Send + Sync {
    /// Driving route from `from` to `to`.
    ///
    /// One call, no retries: failures are classified and returned.
    fn route(&self, from: Coordinate, to: Coordinate) -> RoutingResult<Segment>;
}

impl<R: Router + ?Sized> Router for Arc<R> {
    fn route(&self, from: Coordinate, to: Coordinate) -> RoutingResult<Segment> {
        (**self).route(from, to)
    }
}

impl<R: Router + ?Sized> Router for &R {
    fn route(&self, from: Coordinate, to: Coordinate) -> RoutingResult<Segment> {
        (**self).route(from, to)
    }
}
