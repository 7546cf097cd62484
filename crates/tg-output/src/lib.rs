//! `tg-output` — storage sinks for generated telemetry.
//!
//! Three backends are provided, the SQLite one behind a Cargo feature:
//!
//! | Feature   | Backend     | Files created                                     |
//! |-----------|-------------|---------------------------------------------------|
//! | *(none)*  | in-memory   | —                                                 |
//! | *(none)*  | CSV         | `vehicles.csv`, `points.csv`, `rides.csv`         |
//! | `sqlite`  | SQLite      | `trajgen.db` (tables `vehicles`, `points`, `rides`) |
//!
//! All backends implement [`TelemetrySink`].  Files are opened in append
//! mode so repeated runs accumulate history, which is how the vehicle
//! registry and the rides of earlier runs survive between invocations.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tg_output::{CsvSink, TelemetrySink};
//!
//! let mut sink = CsvSink::open(Path::new("./output"))?;
//! sink.add_vehicle(VehicleId(1))?;
//! assert!(sink.vehicle_exists(VehicleId(1))?);
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod row;
pub mod shared;
pub mod sink;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvSink;
pub use error::{OutputError, OutputResult};
pub use memory::MemorySink;
pub use row::{PointRow, RideRow};
pub use shared::SharedSink;
pub use sink::TelemetrySink;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSink;
