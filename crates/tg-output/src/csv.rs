//! CSV storage backend.
//!
//! Uses three files in the configured directory:
//! - `vehicles.csv` — the vehicle registry (`vehicle_id`)
//! - `points.csv`   — `vehicle_id, lon, lat, timestamp`
//! - `rides.csv`    — `vehicle_id, start, finish`
//!
//! Every file is opened for appending; the header row is written only when
//! the file is new or empty.

use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};

use tg_core::{Ride, TelemetryPoint, VehicleId};

use crate::{OutputError, OutputResult, PointRow, RideRow, TelemetrySink};

const VEHICLES_FILE: &str = "vehicles.csv";
const POINTS_FILE:   &str = "points.csv";
const RIDES_FILE:    &str = "rides.csv";

const POINT_HEADER: [&str; 4] = ["vehicle_id", "lon", "lat", "timestamp"];
const RIDE_HEADER:  [&str; 3] = ["vehicle_id", "start", "finish"];

/// Writes telemetry to CSV files and keeps the vehicle registry in memory.
pub struct CsvSink {
    dir:      PathBuf,
    vehicles: BTreeSet<VehicleId>,
    points:   Writer<File>,
    rides:    Writer<File>,
    finished: bool,
}

impl CsvSink {
    /// Open (or create) the CSV files in `dir`, creating `dir` if needed.
    pub fn open(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let vehicles = read_registry(&dir.join(VEHICLES_FILE))?;
        let points = append_writer(&dir.join(POINTS_FILE), &POINT_HEADER)?;
        let rides = append_writer(&dir.join(RIDES_FILE), &RIDE_HEADER)?;
        log::debug!("csv sink at {} ({} registered vehicles)", dir.display(), vehicles.len());
        Ok(Self {
            dir: dir.to_path_buf(),
            vehicles,
            points,
            rides,
            finished: false,
        })
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Register `vehicle`.  Returns `false` if it was already registered.
    pub fn add_vehicle(&mut self, vehicle: VehicleId) -> OutputResult<bool> {
        if self.vehicles.contains(&vehicle) {
            return Ok(false);
        }
        let mut w = append_writer(&self.dir.join(VEHICLES_FILE), &["vehicle_id"])?;
        w.write_record([vehicle.0.to_string()])?;
        w.flush()?;
        self.vehicles.insert(vehicle);
        Ok(true)
    }
}

impl TelemetrySink for CsvSink {
    fn vehicle_exists(&self, vehicle: VehicleId) -> OutputResult<bool> {
        Ok(self.vehicles.contains(&vehicle))
    }

    fn add_point(&mut self, point: &TelemetryPoint) -> OutputResult<()> {
        let row = PointRow::from(point);
        self.points.write_record(&[
            row.vehicle_id.to_string(),
            row.lon.to_string(),
            row.lat.to_string(),
            row.timestamp,
        ])?;
        Ok(())
    }

    fn add_ride(&mut self, ride: &Ride) -> OutputResult<()> {
        let row = RideRow::from(ride);
        self.rides.write_record(&[row.vehicle_id.to_string(), row.start, row.finish])?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.points.flush()?;
        self.rides.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.flush()
    }
}

/// Open `path` for appending; write `header` if the file is empty.
fn append_writer(path: &Path, header: &[&str]) -> OutputResult<Writer<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let empty = file.metadata()?.len() == 0;
    let mut w = WriterBuilder::new().has_headers(false).from_writer(file);
    if empty {
        w.write_record(header)?;
        w.flush()?;
    }
    Ok(w)
}

/// Registered ids from `vehicles.csv`; empty if the file does not exist.
fn read_registry(path: &Path) -> OutputResult<BTreeSet<VehicleId>> {
    if !path.exists() {
        return Ok(BTreeSet::new());
    }
    let mut rdr = csv::Reader::from_path(path)?;
    let mut ids = BTreeSet::new();
    for record in rdr.records() {
        let record = record?;
        let raw = record.get(0).unwrap_or_default().trim();
        let id = raw
            .parse::<u32>()
            .map_err(|_| OutputError::BadVehicleId(raw.to_owned()))?;
        ids.insert(VehicleId(id));
    }
    Ok(ids)
}
