//! The `TelemetrySink` trait implemented by all storage backends.

use tg_core::{Ride, TelemetryPoint, VehicleId};

use crate::OutputResult;

/// Persistent store of vehicles, points and rides.
///
/// `Send` so a sink can move into a worker thread or sit behind a
/// [`SharedSink`](crate::SharedSink) for a fleet run.
pub trait TelemetrySink: Send {
    /// Whether `vehicle` is registered.  The engine refuses to generate
    /// anything for an unknown vehicle.
    fn vehicle_exists(&self, vehicle: VehicleId) -> OutputResult<bool>;

    fn add_point(&mut self, point: &TelemetryPoint) -> OutputResult<()>;

    fn add_ride(&mut self, ride: &Ride) -> OutputResult<()>;

    /// Push buffered rows to durable storage without closing anything.
    fn flush(&mut self) -> OutputResult<()> {
        Ok(())
    }

    /// Flush and close all underlying handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for Box<S> {
    fn vehicle_exists(&self, vehicle: VehicleId) -> OutputResult<bool> {
        (**self).vehicle_exists(vehicle)
    }

    fn add_point(&mut self, point: &TelemetryPoint) -> OutputResult<()> {
        (**self).add_point(point)
    }

    fn add_ride(&mut self, ride: &Ride) -> OutputResult<()> {
        (**self).add_ride(ride)
    }

    fn flush(&mut self) -> OutputResult<()> {
        (**self).flush()
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for &mut S {
    fn vehicle_exists(&self, vehicle: VehicleId) -> OutputResult<bool> {
        (**self).vehicle_exists(vehicle)
    }

    fn add_point(&mut self, point: &TelemetryPoint) -> OutputResult<()> {
        (**self).add_point(point)
    }

    fn add_ride(&mut self, ride: &Ride) -> OutputResult<()> {
        (**self).add_ride(ride)
    }

    fn flush(&mut self) -> OutputResult<()> {
        (**self).flush()
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}
