//! Ride segmentation.

use chrono::{DateTime, Utc};

use tg_core::{Ride, VehicleId};

/// Tracks the ride currently being emitted for one vehicle.
///
/// A ride opens with the first point after the previous ride closed and
/// spans up to the last point emitted before the queue drained.  A span with
/// no elapsed time is never closed: it stays open and continues into the
/// next segment.
#[derive(Clone, Debug)]
pub struct RideTracker {
    vehicle: VehicleId,
    start:   Option<DateTime<Utc>>,
    last:    Option<DateTime<Utc>>,
}

impl RideTracker {
    pub fn new(vehicle: VehicleId) -> Self {
        Self { vehicle, start: None, last: None }
    }

    /// Record an emitted point.
    pub fn observe(&mut self, timestamp: DateTime<Utc>) {
        self.start.get_or_insert(timestamp);
        self.last = Some(timestamp);
    }

    /// Start of the open ride, if any.
    #[inline]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Close the open ride at its last point.
    ///
    /// Returns `None`, and keeps the ride open, when no time has elapsed
    /// since it started.
    pub fn close(&mut self) -> Option<Ride> {
        let ride = Ride::new(self.vehicle, self.start?, self.last?)?;
        self.start = None;
        self.last = None;
        Some(ride)
    }
}
