//! SQLite storage backend (feature `sqlite`).
//!
//! Uses a single `trajgen.db` file in the configured directory with three
//! tables: `vehicles`, `points` and `rides`.  Points are buffered and
//! written in one transaction per flush.  Foreign keys are enforced, so rows
//! for an unregistered vehicle are rejected.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use tg_core::{Ride, TelemetryPoint, VehicleId};

use crate::{OutputResult, PointRow, RideRow, TelemetrySink};

/// File name of the database inside the output directory.
pub const DB_FILE: &str = "trajgen.db";

/// Points buffered before an automatic flush.
const POINT_BATCH: usize = 512;

/// Writes telemetry to an SQLite database.
pub struct SqliteSink {
    conn:     Connection,
    pending:  Vec<PointRow>,
    finished: bool,
}

impl SqliteSink {
    /// Open (or create) `trajgen.db` in `dir` and initialise the schema.
    pub fn open(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join(DB_FILE))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             PRAGMA foreign_keys = ON;
             CREATE TABLE IF NOT EXISTS vehicles (
                 id INTEGER PRIMARY KEY
             );
             CREATE TABLE IF NOT EXISTS points (
                 vehicle_id INTEGER NOT NULL REFERENCES vehicles(id),
                 lon        REAL    NOT NULL,
                 lat        REAL    NOT NULL,
                 timestamp  TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS rides (
                 vehicle_id INTEGER NOT NULL REFERENCES vehicles(id),
                 start      TEXT    NOT NULL,
                 finish     TEXT    NOT NULL
             );
             CREATE INDEX IF NOT EXISTS points_by_vehicle ON points (vehicle_id, timestamp);",
        )?;

        Ok(Self { conn, pending: Vec::new(), finished: false })
    }

    /// Register `vehicle`.  Returns `false` if it was already registered.
    pub fn add_vehicle(&mut self, vehicle: VehicleId) -> OutputResult<bool> {
        let inserted = self
            .conn
            .execute("INSERT OR IGNORE INTO vehicles (id) VALUES (?1)", [vehicle.0])?;
        Ok(inserted == 1)
    }

    fn write_pending(&mut self) -> OutputResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO points (vehicle_id, lon, lat, timestamp) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in &self.pending {
                stmt.execute(rusqlite::params![row.vehicle_id, row.lon, row.lat, row.timestamp])?;
            }
        }
        tx.commit()?;
        self.pending.clear();
        Ok(())
    }
}

impl TelemetrySink for SqliteSink {
    fn vehicle_exists(&self, vehicle: VehicleId) -> OutputResult<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM vehicles WHERE id = ?1", [vehicle.0], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn add_point(&mut self, point: &TelemetryPoint) -> OutputResult<()> {
        self.pending.push(PointRow::from(point));
        if self.pending.len() >= POINT_BATCH {
            self.write_pending()?;
        }
        Ok(())
    }

    fn add_ride(&mut self, ride: &Ride) -> OutputResult<()> {
        // Points first, so a reader never sees a ride without its points.
        self.write_pending()?;
        let row = RideRow::from(ride);
        self.conn.execute(
            "INSERT INTO rides (vehicle_id, start, finish) VALUES (?1, ?2, ?3)",
            rusqlite::params![row.vehicle_id, row.start, row.finish],
        )?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.write_pending()
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.write_pending()?;
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
