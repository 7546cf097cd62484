use thiserror::Error;

use tg_core::VehicleId;
use tg_output::OutputError;
use tg_routing::RoutingError;
use tg_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The sink has no such vehicle.  Raised before anything is written.
    #[error("unknown vehicle {0}")]
    UnknownVehicle(VehicleId),

    /// City lookup or triangulation failed.
    #[error("city boundary unavailable: {0}")]
    Boundary(SpatialError),

    #[error("no point inside the boundary after {attempts} attempts")]
    SamplingExhausted { attempts: u32 },

    #[error("routing failed {attempts} times in a row; last error: {last}")]
    RoutingExhausted { attempts: u32, last: RoutingError },

    #[error("engine configuration error: {0}")]
    Config(String),

    #[error("sink error: {0}")]
    Sink(#[from] OutputError),
}

impl From<SpatialError> for EngineError {
    fn from(e: SpatialError) -> Self {
        match e {
            SpatialError::SamplingExhausted { attempts } => EngineError::SamplingExhausted { attempts },
            other => EngineError::Boundary(other),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
