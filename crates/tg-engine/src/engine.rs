//! The per-vehicle trajectory engine.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::Arc;

use tg_core::{Coordinate, PacingInterval, Ride, Sleeper, TelemetryPoint, VehicleId, VehicleRng};
use tg_output::TelemetrySink;
use tg_routing::{RateLimitGate, Router, RoutingError, Segment};
use tg_spatial::PointSampler;

use crate::{Clock, EngineError, EngineResult, RetryPolicy, RideTracker, RunReport};

/// What one [`TrajectoryEngine::step`] produced.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub point: TelemetryPoint,
    /// The ride this point completed, if any.
    pub ride:  Option<Ride>,
}

/// A usable segment, split for the queue.
struct Stitched {
    first:         Coordinate,
    rest:          VecDeque<Coordinate>,
    pacing:        PacingInterval,
    duration_secs: f64,
}

impl Stitched {
    /// Rejects segments without coordinates or with an unusable duration.
    fn from_segment(segment: Segment) -> Result<Self, RoutingError> {
        let Some(pacing) = segment.pacing() else {
            return Err(RoutingError::MalformedResponse(format!(
                "{} coordinates over {}s",
                segment.len(),
                segment.duration_secs
            )));
        };
        let duration_secs = segment.duration_secs;
        let mut rest = VecDeque::from(segment.coordinates);
        match rest.pop_front() {
            Some(first) => Ok(Self { first, rest, pacing, duration_secs }),
            None => Err(RoutingError::MalformedResponse("empty segment".into())),
        }
    }
}

// ── TrajectoryEngine ──────────────────────────────────────────────────────────

/// Generates telemetry for one vehicle, one point per [`step`](Self::step).
///
/// Owns its coordinate queue, pacing, clock and RNG; nothing here is shared
/// with other engines except the sampler, the router, the rate-limit gate
/// and (through the sink type) the store.
pub struct TrajectoryEngine<R: Router, C: Clock, S: TelemetrySink> {
    vehicle: VehicleId,
    sampler: Arc<PointSampler>,
    router:  R,
    clock:   C,
    sink:    S,
    rng:     VehicleRng,
    retry:   RetryPolicy,
    gate:    Arc<RateLimitGate>,
    sleeper: Arc<dyn Sleeper>,

    /// Remaining coordinates of the current segment.
    queue:  VecDeque<Coordinate>,
    /// Set once per successful stitch; constant while `queue` drains.
    pacing: PacingInterval,
    rides:  RideTracker,
    /// Flush the sink after every point, not only after every ride.
    flush_points: bool,
    report: RunReport,
}

impl<R: Router, C: Clock, S: TelemetrySink> TrajectoryEngine<R, C, S> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vehicle: VehicleId,
        sampler: Arc<PointSampler>,
        router:  R,
        clock:   C,
        sink:    S,
        rng:     VehicleRng,
        retry:   RetryPolicy,
        gate:    Arc<RateLimitGate>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            vehicle,
            sampler,
            router,
            clock,
            sink,
            rng,
            retry,
            gate,
            sleeper,
            queue: VecDeque::new(),
            pacing: PacingInterval::default(),
            rides: RideTracker::new(vehicle),
            flush_points: false,
            report: RunReport::new(vehicle),
        }
    }

    /// Flush the sink after every point (real-time runs).
    pub fn flush_every_point(mut self, yes: bool) -> Self {
        self.flush_points = yes;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn vehicle(&self) -> VehicleId {
        self.vehicle
    }

    #[inline]
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Pacing of the segment currently draining.
    #[inline]
    pub fn pacing(&self) -> PacingInterval {
        self.pacing
    }

    #[inline]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Emit one point, stitching a new segment first if the queue is empty.
    pub fn step(&mut self) -> EngineResult<StepOutcome> {
        let coordinate = match self.queue.pop_front() {
            Some(c) => c,
            None => self.refill()?,
        };

        let point = TelemetryPoint {
            vehicle: self.vehicle,
            coordinate,
            timestamp: self.clock.now(),
        };
        self.sink.add_point(&point)?;
        self.rides.observe(point.timestamp);
        self.report.points += 1;
        log::trace!("{} at {} ({})", self.vehicle, point.coordinate, point.timestamp);

        let ride = if self.queue.is_empty() { self.rides.close() } else { None };
        if let Some(ride) = &ride {
            self.sink.add_ride(ride)?;
            self.sink.flush()?;
            self.report.rides += 1;
            log::info!(
                "{}: ride {} closed, {} -> {} ({}s)",
                self.vehicle,
                self.report.rides,
                ride.start(),
                ride.finish(),
                ride.duration().num_milliseconds() as f64 / 1_000.0,
            );
        } else if self.flush_points {
            self.sink.flush()?;
        }

        self.clock.advance(self.pacing)?;
        Ok(StepOutcome { point, ride })
    }

    /// Step until `rides` more rides have closed.
    pub fn run_rides(&mut self, rides: u32) -> EngineResult<&RunReport> {
        let target = self.report.rides.saturating_add(rides);
        while self.report.rides < target {
            self.step()?;
        }
        Ok(&self.report)
    }

    /// Step until an error occurs.
    pub fn run_forever(&mut self) -> EngineResult<Infallible> {
        loop {
            self.step()?;
        }
    }

    /// Flush the sink and return the report.
    ///
    /// The sink is not finished: it may outlive this engine.
    pub fn into_report(mut self) -> EngineResult<RunReport> {
        self.sink.flush()?;
        Ok(self.report)
    }

    // ── Refill ────────────────────────────────────────────────────────────

    /// Stitch a segment, enqueue all but its first coordinate, return the
    /// first.
    fn refill(&mut self) -> EngineResult<Coordinate> {
        let stitched = self.stitch()?;
        self.pacing = stitched.pacing;
        self.report.segments += 1;
        log::debug!(
            "{}: segment {} with {} points over {:.0}s ({})",
            self.vehicle,
            self.report.segments,
            stitched.rest.len() + 1,
            stitched.duration_secs,
            stitched.pacing,
        );
        self.queue = stitched.rest;
        Ok(stitched.first)
    }

    /// Route between freshly sampled endpoints until a usable segment comes
    /// back or the retry budget is spent.
    fn stitch(&mut self) -> EngineResult<Stitched> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            self.gate.wait(&*self.sleeper);

            let from = self.sampler.sample(&mut self.rng)?;
            let to = self.sampler.sample(&mut self.rng)?;
            self.report.routing_calls += 1;

            let err = match self.router.route(from, to) {
                Ok(segment) => match Stitched::from_segment(segment) {
                    Ok(stitched) => return Ok(stitched),
                    Err(e) => e,
                },
                Err(e) => e,
            };

            self.report.record_failure(err.kind());
            match &err {
                RoutingError::RateLimited => {
                    log::warn!(
                        "{}: routing rate-limited, backing off {:?}",
                        self.vehicle,
                        self.retry.rate_limit_backoff
                    );
                    self.gate.close_for(self.retry.rate_limit_backoff, &*self.sleeper);
                }
                RoutingError::Unroutable(msg) => {
                    log::debug!("{}: {from} -> {to} unroutable: {msg}", self.vehicle);
                }
                other => {
                    log::warn!("{}: routing attempt {attempt} failed: {other}", self.vehicle);
                }
            }

            if attempt >= self.retry.max_attempts {
                return Err(EngineError::RoutingExhausted { attempts: attempt, last: err });
            }
        }
    }
}
