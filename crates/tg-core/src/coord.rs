//! Geographic coordinate type.
//!
//! `Coordinate` stores longitude first, matching GeoJSON and the routing
//! service's wire order.  Double precision is kept end to end because the
//! points are persisted, not just simulated.

use serde::{Deserialize, Serialize};

/// A WGS-84 (longitude, latitude) pair.  No altitude.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// `[lon, lat]`, the order used on the wire.
    #[inline]
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<::geo::Coord<f64>> for Coordinate {
    #[inline]
    fn from(c: ::geo::Coord<f64>) -> Self {
        Self { lon: c.x, lat: c.y }
    }
}

impl From<Coordinate> for ::geo::Coord<f64> {
    #[inline]
    fn from(c: Coordinate) -> Self {
        ::geo::Coord { x: c.lon, y: c.lat }
    }
}

impl From<Coordinate> for ::geo::Point<f64> {
    #[inline]
    fn from(c: Coordinate) -> Self {
        ::geo::Point::new(c.lon, c.lat)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "POINT ({:.6} {:.6})", self.lon, self.lat)
    }
}
