//! Flat row types written by the file and database backends.

use chrono::{DateTime, SecondsFormat, Utc};

use tg_core::{Ride, TelemetryPoint};

/// Timestamps are stored as RFC 3339 UTC strings with millisecond
/// precision, e.g. `2024-01-01T10:00:03.250Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One row of `points`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRow {
    pub vehicle_id: u32,
    pub lon:        f64,
    pub lat:        f64,
    pub timestamp:  String,
}

impl From<&TelemetryPoint> for PointRow {
    fn from(p: &TelemetryPoint) -> Self {
        Self {
            vehicle_id: p.vehicle.0,
            lon:        p.coordinate.lon,
            lat:        p.coordinate.lat,
            timestamp:  format_timestamp(p.timestamp),
        }
    }
}

/// One row of `rides`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideRow {
    pub vehicle_id: u32,
    pub start:      String,
    pub finish:     String,
}

impl From<&Ride> for RideRow {
    fn from(r: &Ride) -> Self {
        Self {
            vehicle_id: r.vehicle().0,
            start:      format_timestamp(r.start()),
            finish:     format_timestamp(r.finish()),
        }
    }
}
