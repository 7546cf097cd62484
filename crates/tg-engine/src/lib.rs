//! `tg-engine` — trajectory synthesis for the trajgen generator.
//!
//! # Per-point loop
//!
//! ```text
//! step():
//!   ① Refill   — queue empty: sample two endpoints, route between them
//!                (bounded retries, shared rate-limit gate), enqueue the
//!                path, pacing = duration / coordinate count.
//!   ② Emit     — dequeue one coordinate, stamp it with the clock, hand
//!                the point to the sink.
//!   ③ Segment  — queue drained and time has moved since the ride began:
//!                persist the ride.
//!   ④ Advance  — virtual clock += pacing, or wall-clock wait (real time).
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs fleet engines on Rayon's thread pool.             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tg_engine::{GeneratorBuilder, RunMode, RunRequest};
//!
//! let mut generator = GeneratorBuilder::new(config, resolver, router, sink).build()?;
//! let report = generator.run(&RunRequest {
//!     vehicle: VehicleId(1),
//!     city:    "Berlin".into(),
//!     rides:   5,
//!     mode:    RunMode::Offset { days: -7.0 },
//! })?;
//! ```

pub mod clock;
pub mod engine;
pub mod error;
pub mod fleet;
pub mod generator;
pub mod report;
pub mod retry;
pub mod ride;


pub use clock::{Clock, RunMode, VirtualClock, WallClock, round_up_to_ticks};
pub use engine::{StepOutcome, TrajectoryEngine};
pub use error::{EngineError, EngineResult};
pub use fleet::FleetRequest;
pub use generator::{Generator, GeneratorBuilder, RunRequest};
pub use report::RunReport;
pub use retry::RetryPolicy;
pub use ride::RideTracker;
