//! Run statistics.

use std::collections::BTreeMap;
use std::fmt;

use tg_core::VehicleId;

/// What one engine produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub vehicle:       VehicleId,
    pub points:        u64,
    pub rides:         u32,
    /// Segments successfully stitched and enqueued.
    pub segments:      u32,
    pub routing_calls: u32,
    /// Failed routing attempts per error kind.
    pub failures:      BTreeMap<&'static str, u32>,
}

impl RunReport {
    pub fn new(vehicle: VehicleId) -> Self {
        Self {
            vehicle,
            points:        0,
            rides:         0,
            segments:      0,
            routing_calls: 0,
            failures:      BTreeMap::new(),
        }
    }

    pub(crate) fn record_failure(&mut self, kind: &'static str) {
        *self.failures.entry(kind).or_default() += 1;
    }

    pub fn failure_count(&self) -> u32 {
        self.failures.values().sum()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} rides, {} points, {} segments, {} routing calls ({} failed)",
            self.vehicle,
            self.rides,
            self.points,
            self.segments,
            self.routing_calls,
            self.failure_count(),
        )
    }
}
