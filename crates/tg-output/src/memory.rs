//! In-memory sink, for tests and dry runs.

use std::collections::BTreeSet;

use tg_core::{Ride, TelemetryPoint, VehicleId};

use crate::{OutputResult, TelemetrySink};

/// Keeps every point and ride in a `Vec`.
#[derive(Debug, Default)]
pub struct MemorySink {
    vehicles: BTreeSet<VehicleId>,
    points:   Vec<TelemetryPoint>,
    rides:    Vec<Ride>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink with `vehicles` already registered.
    pub fn with_vehicles(vehicles: impl IntoIterator<Item = VehicleId>) -> Self {
        Self { vehicles: vehicles.into_iter().collect(), ..Self::default() }
    }

    pub fn add_vehicle(&mut self, vehicle: VehicleId) -> bool {
        self.vehicles.insert(vehicle)
    }

    pub fn points(&self) -> &[TelemetryPoint] {
        &self.points
    }

    pub fn rides(&self) -> &[Ride] {
        &self.rides
    }

    /// Points belonging to `ride`: same vehicle, timestamp within
    /// `[start, finish]`.
    pub fn points_of(&self, ride: &Ride) -> Vec<TelemetryPoint> {
        self.points
            .iter()
            .filter(|p| {
                p.vehicle == ride.vehicle() && p.timestamp >= ride.start() && p.timestamp <= ride.finish()
            })
            .copied()
            .collect()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl TelemetrySink for MemorySink {
    fn vehicle_exists(&self, vehicle: VehicleId) -> OutputResult<bool> {
        Ok(self.vehicles.contains(&vehicle))
    }

    fn add_point(&mut self, point: &TelemetryPoint) -> OutputResult<()> {
        self.points.push(*point);
        Ok(())
    }

    fn add_ride(&mut self, ride: &Ride) -> OutputResult<()> {
        self.rides.push(*ride);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
