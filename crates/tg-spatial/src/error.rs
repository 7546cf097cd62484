//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `tg-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no boundary found for city {city:?}: {reason}")]
    NotFound { city: String, reason: String },

    #[error("boundary has no polygon area")]
    EmptyBoundary,

    #[error("triangulation produced no usable triangles")]
    EmptyTriangulation,

    #[error("no point inside the boundary after {attempts} sampling attempts")]
    SamplingExhausted { attempts: u32 },

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] Box<geojson::Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<geojson::Error> for SpatialError {
    fn from(e: geojson::Error) -> Self {
        SpatialError::GeoJson(Box::new(e))
    }
}

pub type SpatialResult<T> = Result<T, SpatialError>;
