//! `tg-core` — foundational types for the `trajgen` trajectory generator.
//!
//! This crate is a dependency of every other `tg-*` crate.  It has no `tg-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `VehicleId`                                           |
//! | [`coord`]       | `Coordinate` and its `geo` conversions                |
//! | [`time`]        | `PacingInterval`, `Sleeper`, day-offset helpers       |
//! | [`telemetry`]   | `TelemetryPoint`, `Ride`                              |
//! | [`rng`]         | `VehicleRng` (per-vehicle, seedable)                  |
//! | [`config`]      | `GeneratorConfig` and its TOML loader                 |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod config;
pub mod error;
pub mod coord;
pub mod ids;
pub mod rng;
pub mod telemetry;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{BoundaryConfig, GeneratorConfig, RealtimeConfig, RoutingConfig, SamplingConfig};
pub use error::{CoreError, CoreResult};
pub use coord::Coordinate;
pub use ids::VehicleId;
pub use rng::VehicleRng;
pub use telemetry::{Ride, TelemetryPoint};
pub use time::{PacingInterval, Sleeper, ThreadSleeper, VirtualSleeper, days_offset};
