//! A sink shared by several engines.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use tg_core::{Ride, TelemetryPoint, VehicleId};

use crate::{OutputResult, TelemetrySink};

/// Cloneable handle serializing access to one underlying sink.
///
/// Every clone writes to the same store; each call takes the lock for the
/// duration of one row, so rows of different vehicles interleave but never
/// tear.
pub struct SharedSink<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for SharedSink<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: TelemetrySink> SharedSink<S> {
    pub fn new(sink: S) -> Self {
        Self { inner: Arc::new(Mutex::new(sink)) }
    }

    /// Direct access to the underlying sink.
    pub fn lock(&self) -> MutexGuard<'_, S> {
        self.inner.lock()
    }

    /// The underlying sink, if this is the last handle.
    pub fn try_into_inner(self) -> Result<S, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<S: TelemetrySink> TelemetrySink for SharedSink<S> {
    fn vehicle_exists(&self, vehicle: VehicleId) -> OutputResult<bool> {
        self.inner.lock().vehicle_exists(vehicle)
    }

    fn add_point(&mut self, point: &TelemetryPoint) -> OutputResult<()> {
        self.inner.lock().add_point(point)
    }

    fn add_ride(&mut self, ride: &Ride) -> OutputResult<()> {
        self.inner.lock().add_ride(ride)
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.inner.lock().flush()
    }

    /// Flushes only: other handles may still be writing.  The owner of the
    /// last handle finishes the underlying sink.
    fn finish(&mut self) -> OutputResult<()> {
        self.inner.lock().flush()
    }
}
