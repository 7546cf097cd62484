//! Unit tests for tg-output.

#[cfg(test)]
mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};

    use tg_core::{Coordinate, Ride, TelemetryPoint, VehicleId};

    pub fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap() + chrono::TimeDelta::seconds(secs)
    }

    pub fn point(vehicle: u32, secs: i64) -> TelemetryPoint {
        TelemetryPoint {
            vehicle:    VehicleId(vehicle),
            coordinate: Coordinate::new(13.4 + secs as f64 * 0.001, 52.5),
            timestamp:  at(secs),
        }
    }

    pub fn ride(vehicle: u32, start: i64, finish: i64) -> Ride {
        Ride::new(VehicleId(vehicle), at(start), at(finish)).unwrap()
    }
}

#[cfg(test)]
mod row_tests {
    use super::fixtures::*;
    use crate::row::{PointRow, RideRow, format_timestamp};

    #[test]
    fn timestamps_are_rfc3339_millis() {
        assert_eq!(format_timestamp(at(3)), "2024-01-01T10:00:03.000Z");
    }

    #[test]
    fn point_row_fields() {
        let row = PointRow::from(&point(4, 0));
        assert_eq!(row.vehicle_id, 4);
        assert_eq!(row.lon, 13.4);
        assert_eq!(row.lat, 52.5);
    }

    #[test]
    fn ride_row_keeps_vehicle() {
        let row = RideRow::from(&ride(9, 0, 20));
        assert_eq!(row.vehicle_id, 9);
        assert_eq!(row.finish, "2024-01-01T10:00:20.000Z");
    }
}

#[cfg(test)]
mod memory_tests {
    use super::fixtures::*;
    use crate::{MemorySink, TelemetrySink};
    use tg_core::VehicleId;

    #[test]
    fn registry() {
        let mut sink = MemorySink::with_vehicles([VehicleId(1)]);
        assert!(sink.vehicle_exists(VehicleId(1)).unwrap());
        assert!(!sink.vehicle_exists(VehicleId(2)).unwrap());
        assert!(sink.add_vehicle(VehicleId(2)));
        assert!(!sink.add_vehicle(VehicleId(2)));
    }

    #[test]
    fn points_of_ride_uses_closed_interval() {
        let mut sink = MemorySink::new();
        for s in [0, 10, 20, 30] {
            sink.add_point(&point(1, s)).unwrap();
        }
        sink.add_point(&point(2, 10)).unwrap();
        let r = ride(1, 0, 20);
        sink.add_ride(&r).unwrap();
        assert_eq!(sink.points_of(&r).len(), 3);
        assert_eq!(sink.rides(), &[r]);
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::fixtures::*;
    use crate::csv::CsvSink;
    use crate::sink::TelemetrySink;
    use tg_core::VehicleId;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn rows(path: &std::path::Path) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created_with_headers() {
        let dir = tmp();
        let mut s = CsvSink::open(dir.path()).unwrap();
        s.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("points.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["vehicle_id", "lon", "lat", "timestamp"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("rides.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["vehicle_id", "start", "finish"]);
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("a").join("b");
        let _s = CsvSink::open(&nested).unwrap();
        assert!(nested.join("points.csv").exists());
    }

    #[test]
    fn unknown_vehicle_until_registered() {
        let dir = tmp();
        let mut s = CsvSink::open(dir.path()).unwrap();
        assert!(!s.vehicle_exists(VehicleId(3)).unwrap());
        assert!(s.add_vehicle(VehicleId(3)).unwrap());
        assert!(!s.add_vehicle(VehicleId(3)).unwrap());
        assert!(s.vehicle_exists(VehicleId(3)).unwrap());
    }

    #[test]
    fn registry_survives_reopen() {
        let dir = tmp();
        {
            let mut s = CsvSink::open(dir.path()).unwrap();
            s.add_vehicle(VehicleId(5)).unwrap();
            s.add_vehicle(VehicleId(6)).unwrap();
        }
        let s = CsvSink::open(dir.path()).unwrap();
        assert!(s.vehicle_exists(VehicleId(5)).unwrap());
        assert!(s.vehicle_exists(VehicleId(6)).unwrap());
        assert_eq!(rows(&dir.path().join("vehicles.csv")).len(), 2);
    }

    #[test]
    fn bad_registry_row_is_an_error() {
        let dir = tmp();
        std::fs::write(dir.path().join("vehicles.csv"), "vehicle_id\nbus-7\n").unwrap();
        assert!(CsvSink::open(dir.path()).is_err());
    }

    #[test]
    fn points_and_rides_written() {
        let dir = tmp();
        let mut s = CsvSink::open(dir.path()).unwrap();
        s.add_point(&point(1, 0)).unwrap();
        s.add_point(&point(1, 10)).unwrap();
        s.add_ride(&ride(1, 0, 10)).unwrap();
        s.finish().unwrap();

        let points = rows(&dir.path().join("points.csv"));
        assert_eq!(points.len(), 2);
        assert_eq!(&points[0][0], "1");
        assert_eq!(&points[1][3], "2024-01-01T10:00:10.000Z");

        let rides = rows(&dir.path().join("rides.csv"));
        assert_eq!(rides.len(), 1);
        assert_eq!(&rides[0][1], "2024-01-01T10:00:00.000Z");
    }

    #[test]
    fn reopen_appends_without_second_header() {
        let dir = tmp();
        for s in [0, 10] {
            let mut sink = CsvSink::open(dir.path()).unwrap();
            sink.add_point(&point(1, s)).unwrap();
            sink.finish().unwrap();
        }
        let points = rows(&dir.path().join("points.csv"));
        assert_eq!(points.len(), 2);
        assert_eq!(&points[1][0], "1");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut s = CsvSink::open(dir.path()).unwrap();
        s.finish().unwrap();
        s.finish().unwrap();
    }
}

#[cfg(test)]
mod shared_tests {
    use super::fixtures::*;
    use crate::{MemorySink, SharedSink, TelemetrySink};
    use tg_core::VehicleId;

    #[test]
    fn clones_write_to_one_store() {
        let shared = SharedSink::new(MemorySink::with_vehicles([VehicleId(1), VehicleId(2)]));
        let mut a = shared.clone();
        let mut b = shared.clone();
        a.add_point(&point(1, 0)).unwrap();
        b.add_point(&point(2, 0)).unwrap();
        b.add_ride(&ride(2, 0, 5)).unwrap();
        assert!(a.vehicle_exists(VehicleId(2)).unwrap());
        assert_eq!(shared.lock().points().len(), 2);
        assert_eq!(shared.lock().rides().len(), 1);
    }

    #[test]
    fn into_inner_needs_last_handle() {
        let shared = SharedSink::new(MemorySink::new());
        let other = shared.clone();
        let shared = shared.try_into_inner().unwrap_err();
        drop(other);
        assert!(shared.try_into_inner().is_ok());
    }

    #[test]
    fn finish_on_a_handle_does_not_close_the_store() {
        let shared = SharedSink::new(MemorySink::new());
        let mut h = shared.clone();
        h.finish().unwrap();
        assert!(!shared.lock().is_finished());
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::fixtures::*;
    use crate::OutputError;
    use crate::sink::TelemetrySink;
    use crate::sqlite::{DB_FILE, SqliteSink};
    use tg_core::VehicleId;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn count(dir: &TempDir, table: &str) -> i64 {
        let conn = rusqlite::Connection::open(dir.path().join(DB_FILE)).unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _s = SqliteSink::open(dir.path()).unwrap();
        assert!(dir.path().join(DB_FILE).exists());
    }

    #[test]
    fn sqlite_vehicle_registry() {
        let dir = tmp();
        let mut s = SqliteSink::open(dir.path()).unwrap();
        assert!(!s.vehicle_exists(VehicleId(1)).unwrap());
        assert!(s.add_vehicle(VehicleId(1)).unwrap());
        assert!(!s.add_vehicle(VehicleId(1)).unwrap());
        assert!(s.vehicle_exists(VehicleId(1)).unwrap());
    }

    #[test]
    fn sqlite_points_flushed_before_ride() {
        let dir = tmp();
        let mut s = SqliteSink::open(dir.path()).unwrap();
        s.add_vehicle(VehicleId(1)).unwrap();
        for secs in [0, 10, 20] {
            s.add_point(&point(1, secs)).unwrap();
        }
        s.add_ride(&ride(1, 0, 20)).unwrap();
        assert_eq!(count(&dir, "points"), 3);
        assert_eq!(count(&dir, "rides"), 1);
    }

    #[test]
    fn sqlite_ride_row() {
        let dir = tmp();
        let mut s = SqliteSink::open(dir.path()).unwrap();
        s.add_vehicle(VehicleId(7)).unwrap();
        s.add_ride(&ride(7, 0, 20)).unwrap();
        s.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join(DB_FILE)).unwrap();
        let (vehicle, start, finish): (i64, String, String) = conn
            .query_row("SELECT vehicle_id, start, finish FROM rides", [], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?))
            })
            .unwrap();
        assert_eq!(vehicle, 7);
        assert_eq!(start, "2024-01-01T10:00:00.000Z");
        assert_eq!(finish, "2024-01-01T10:00:20.000Z");
    }

    #[test]
    fn sqlite_finish_writes_pending_points() {
        let dir = tmp();
        let mut s = SqliteSink::open(dir.path()).unwrap();
        s.add_vehicle(VehicleId(1)).unwrap();
        s.add_point(&point(1, 0)).unwrap();
        s.finish().unwrap();
        s.finish().unwrap();
        assert_eq!(count(&dir, "points"), 1);
    }

    #[test]
    fn sqlite_rejects_unregistered_vehicle() {
        let dir = tmp();
        let mut s = SqliteSink::open(dir.path()).unwrap();
        s.add_vehicle(VehicleId(1)).unwrap();

        let err = s.add_ride(&ride(9, 0, 20)).unwrap_err();
        assert!(matches!(err, OutputError::Sqlite(_)));
        assert_eq!(count(&dir, "rides"), 0);

        s.add_point(&point(9, 0)).unwrap();
        assert!(matches!(s.flush(), Err(OutputError::Sqlite(_))));
        assert_eq!(count(&dir, "points"), 0);
    }
}
