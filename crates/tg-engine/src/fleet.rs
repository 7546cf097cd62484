//! Several vehicles in one city, one engine each.
//!
//! Engines share the boundary sampler, the router, the rate-limit gate and
//! the sink; queues, clocks and RNGs stay private to each engine.  With the
//! `parallel` feature the engines run on Rayon's thread pool.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;

use tg_core::VehicleId;
use tg_output::TelemetrySink;
use tg_routing::Router;

use crate::{EngineError, EngineResult, Generator, RunMode, RunReport, TrajectoryEngine, VirtualClock};

/// Many vehicles, one city, one virtual-time mode.
#[derive(Clone, Debug, PartialEq)]
pub struct FleetRequest {
    pub vehicles: Vec<VehicleId>,
    pub city:     String,
    /// Rides to complete per vehicle.
    pub rides:    u32,
    /// `Batch` or `Offset`; every vehicle starts at the same instant.
    pub mode:     RunMode,
}

impl<R: Router, S: TelemetrySink + Clone + Sync> Generator<R, S> {
    /// Run one engine per vehicle against a shared sink handle.
    ///
    /// Every vehicle is checked before anything is resolved or written.
    /// Reports come back in `req.vehicles` order.
    pub fn run_fleet(&mut self, req: &FleetRequest) -> EngineResult<Vec<RunReport>> {
        if req.mode.is_realtime() {
            return Err(EngineError::Config("real-time mode runs one vehicle at a time".into()));
        }
        let mut seen = BTreeSet::new();
        for &vehicle in &req.vehicles {
            if !seen.insert(vehicle) {
                return Err(EngineError::Config(format!("{vehicle} listed twice")));
            }
            self.check_vehicle(vehicle)?;
        }

        let start = req
            .mode
            .start(Utc::now())
            .ok_or_else(|| EngineError::Config("day offset out of range".into()))?;
        let sampler = self.prepare(&req.city)?;
        log::info!(
            "fleet of {} in {}: {} rides each from {start}",
            req.vehicles.len(),
            req.city,
            req.rides
        );

        let this = &*self;
        let run_one = |vehicle: VehicleId| -> EngineResult<RunReport> {
            let mut engine = TrajectoryEngine::new(
                vehicle,
                Arc::clone(&sampler),
                &this.router,
                VirtualClock::new(start),
                this.sink.clone(),
                this.rng_for(vehicle),
                this.retry(),
                Arc::clone(&this.gate),
                Arc::clone(&this.sleeper),
            );
            engine.run_rides(req.rides)?;
            engine.into_report()
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<EngineResult<RunReport>> = req.vehicles.iter().map(|&v| run_one(v)).collect();

        #[cfg(feature = "parallel")]
        let results: Vec<EngineResult<RunReport>> = {
            use rayon::prelude::*;
            req.vehicles.par_iter().map(|&v| run_one(v)).collect()
        };

        let reports = results.into_iter().collect::<EngineResult<Vec<_>>>()?;
        self.sink.flush()?;
        Ok(reports)
    }
}
