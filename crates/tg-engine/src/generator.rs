//! The public entry point: resolve a city, then run an engine for a vehicle.

use std::sync::Arc;

use chrono::Utc;

use tg_core::{GeneratorConfig, Sleeper, ThreadSleeper, VehicleId, VehicleRng};
use tg_output::TelemetrySink;
use tg_routing::{RateLimitGate, Router};
use tg_spatial::{BoundaryResolver, EarcutTriangulator, PointSampler, TriangleSelection, Triangulator};

use crate::{
    Clock, EngineError, EngineResult, RetryPolicy, RunMode, RunReport, TrajectoryEngine, VirtualClock,
    WallClock,
};

/// One vehicle, one city, one mode.
#[derive(Clone, Debug, PartialEq)]
pub struct RunRequest {
    pub vehicle: VehicleId,
    pub city:    String,
    /// Rides to complete.  Ignored in real-time mode, which never ends.
    pub rides:   u32,
    pub mode:    RunMode,
}

// ── Generator ─────────────────────────────────────────────────────────────────

/// Owns the collaborators and builds one engine per run.
///
/// Create via [`GeneratorBuilder`].
pub struct Generator<R: Router, S: TelemetrySink> {
    pub(crate) config:       GeneratorConfig,
    pub(crate) resolver:     Box<dyn BoundaryResolver>,
    pub(crate) triangulator: Box<dyn Triangulator>,
    pub(crate) router:       R,
    pub(crate) sink:         S,
    pub(crate) gate:         Arc<RateLimitGate>,
    pub(crate) sleeper:      Arc<dyn Sleeper>,
}

impl<R: Router, S: TelemetrySink> Generator<R, S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Generate telemetry for `req.vehicle`.
    ///
    /// An unknown vehicle is rejected before the city is resolved or
    /// anything is written.  Batch and offset runs return once `req.rides`
    /// rides have closed; a real-time run only returns on error.
    pub fn run(&mut self, req: &RunRequest) -> EngineResult<RunReport> {
        self.check_vehicle(req.vehicle)?;
        let sampler = self.prepare(&req.city)?;
        let rng = self.rng_for(req.vehicle);

        match req.mode {
            RunMode::Batch { .. } | RunMode::Offset { .. } => {
                let start = req
                    .mode
                    .start(Utc::now())
                    .ok_or_else(|| EngineError::Config("day offset out of range".into()))?;
                log::info!(
                    "{}: {} rides in {} from {start}",
                    req.vehicle,
                    req.rides,
                    req.city
                );
                let mut engine = self.engine(req.vehicle, sampler, rng, VirtualClock::new(start));
                engine.run_rides(req.rides)?;
                engine.into_report()
            }
            RunMode::Realtime { offset_days } => {
                let start = req
                    .mode
                    .start(Utc::now())
                    .ok_or_else(|| EngineError::Config("day offset out of range".into()))?;
                log::info!("{}: real-time run in {} (offset {offset_days} days)", req.vehicle, req.city);
                let clock = WallClock::new(start, self.config.poll_tick(), Arc::clone(&self.sleeper));
                let mut engine = self
                    .engine(req.vehicle, sampler, rng, clock)
                    .flush_every_point(true);
                match engine.run_forever() {
                    Ok(never) => match never {},
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Finish the sink.  Call once, after the last run.
    pub fn finish(&mut self) -> EngineResult<()> {
        self.sink.finish()?;
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    #[inline]
    pub fn gate(&self) -> &Arc<RateLimitGate> {
        &self.gate
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    pub(crate) fn check_vehicle(&self, vehicle: VehicleId) -> EngineResult<()> {
        if self.sink.vehicle_exists(vehicle)? {
            Ok(())
        } else {
            Err(EngineError::UnknownVehicle(vehicle))
        }
    }

    /// Resolve and triangulate `city`.
    pub(crate) fn prepare(&self, city: &str) -> EngineResult<Arc<PointSampler>> {
        let boundary = self.resolver.resolve(city).map_err(EngineError::Boundary)?;
        let triangles = self
            .triangulator
            .triangulate(&boundary)
            .map_err(EngineError::Boundary)?;
        log::info!(
            "{city}: {} polygon(s), {} triangles",
            boundary.part_count(),
            triangles.len()
        );
        let selection = if self.config.sampling.area_weighted {
            TriangleSelection::AreaWeighted
        } else {
            TriangleSelection::Uniform
        };
        let sampler = PointSampler::new(boundary, triangles, selection, self.config.sampling.max_attempts)
            .map_err(EngineError::Boundary)?;
        Ok(Arc::new(sampler))
    }

    pub(crate) fn rng_for(&self, vehicle: VehicleId) -> VehicleRng {
        match self.config.seed {
            Some(seed) => VehicleRng::new(seed, vehicle),
            None => VehicleRng::from_entropy(),
        }
    }

    #[inline]
    pub(crate) fn retry(&self) -> RetryPolicy {
        RetryPolicy::from_config(&self.config.routing)
    }

    fn engine<C: Clock>(
        &mut self,
        vehicle: VehicleId,
        sampler: Arc<PointSampler>,
        rng:     VehicleRng,
        clock:   C,
    ) -> TrajectoryEngine<&R, C, &mut S> {
        let retry = self.retry();
        TrajectoryEngine::new(
            vehicle,
            sampler,
            &self.router,
            clock,
            &mut self.sink,
            rng,
            retry,
            Arc::clone(&self.gate),
            Arc::clone(&self.sleeper),
        )
    }
}

// ── GeneratorBuilder ──────────────────────────────────────────────────────────

/// Fluent builder for [`Generator<R, S>`].
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                |
/// |----------------------|----------------------------------------|
/// | `.triangulator(t)`   | `EarcutTriangulator`                   |
/// | `.gate(g)`           | a private `RateLimitGate`              |
/// | `.sleeper(s)`        | `ThreadSleeper` (real blocking waits)  |
///
/// # Example
///
/// ```rust,ignore
/// let mut generator = GeneratorBuilder::new(config, FileResolver::new("cities"), router, sink)
///     .gate(shared_gate)
///     .build()?;
/// ```
pub struct GeneratorBuilder<R: Router, S: TelemetrySink> {
    config:       GeneratorConfig,
    resolver:     Box<dyn BoundaryResolver>,
    triangulator: Option<Box<dyn Triangulator>>,
    router:       R,
    sink:         S,
    gate:         Option<Arc<RateLimitGate>>,
    sleeper:      Option<Arc<dyn Sleeper>>,
}

impl<R: Router, S: TelemetrySink> GeneratorBuilder<R, S> {
    /// Create a builder with all required inputs.
    pub fn new(
        config:   GeneratorConfig,
        resolver: impl BoundaryResolver + 'static,
        router:   R,
        sink:     S,
    ) -> Self {
        Self {
            config,
            resolver:     Box::new(resolver),
            triangulator: None,
            router,
            sink,
            gate:         None,
            sleeper:      None,
        }
    }

    pub fn triangulator(mut self, triangulator: impl Triangulator + 'static) -> Self {
        self.triangulator = Some(Box::new(triangulator));
        self
    }

    /// Share a rate-limit gate with other generators using the same API key.
    pub fn gate(mut self, gate: Arc<RateLimitGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Replace real blocking waits, e.g. with a `VirtualSleeper` in tests.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Validate the configuration and return a ready-to-run [`Generator`].
    pub fn build(self) -> EngineResult<Generator<R, S>> {
        self.config
            .validate()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        Ok(Generator {
            config:       self.config,
            resolver:     self.resolver,
            triangulator: self.triangulator.unwrap_or_else(|| Box::new(EarcutTriangulator)),
            router:       self.router,
            sink:         self.sink,
            gate:         self.gate.unwrap_or_default(),
            sleeper:      self.sleeper.unwrap_or_else(|| Arc::new(ThreadSleeper)),
        })
    }
}
