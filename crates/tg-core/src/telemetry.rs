//! Records handed to the storage sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Coordinate, VehicleId};

/// One timestamped position of a vehicle.
///
/// Created by the engine on each dequeue and owned by the sink afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPoint {
    pub vehicle:    VehicleId,
    pub coordinate: Coordinate,
    pub timestamp:  DateTime<Utc>,
}

/// A contiguous span of telemetry for one vehicle.
///
/// The point count is implicit: every point of `vehicle` with a timestamp in
/// `[start, finish]` belongs to this ride.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ride {
    vehicle: VehicleId,
    start:   DateTime<Utc>,
    finish:  DateTime<Utc>,
}

impl Ride {
    /// Build a ride.  Returns `None` unless `start < finish`.
    pub fn new(vehicle: VehicleId, start: DateTime<Utc>, finish: DateTime<Utc>) -> Option<Self> {
        (start < finish).then_some(Self { vehicle, start, finish })
    }

    #[inline]
    pub fn vehicle(&self) -> VehicleId {
        self.vehicle
    }

    #[inline]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[inline]
    pub fn finish(&self) -> DateTime<Utc> {
        self.finish
    }

    /// Elapsed time between start and finish.
    #[inline]
    pub fn duration(&self) -> chrono::TimeDelta {
        self.finish - self.start
    }
}
