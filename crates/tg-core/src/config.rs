//! Generator configuration.
//!
//! Loaded from a TOML file by the binary and overridden by command-line
//! flags.  Every field has a default, so an empty file (or no file) is a
//! valid configuration:
//!
//! ```toml
//! seed = 42
//!
//! [routing]
//! endpoint = "https://api.openrouteservice.org/v2/directions/driving-car/geojson"
//! max_attempts = 100
//! rate_limit_backoff_secs = 10
//!
//! [realtime]
//! poll_tick_ms = 1000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Top-level generator configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Master RNG seed.  `None` seeds from OS entropy; the same seed always
    /// samples the same endpoints for the same vehicle.
    pub seed: Option<u64>,

    pub routing:  RoutingConfig,
    pub boundary: BoundaryConfig,
    pub sampling: SamplingConfig,
    pub realtime: RealtimeConfig,
}

/// Routing service and retry settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Directions endpoint returning GeoJSON.
    pub endpoint: String,

    /// API key sent in the `Authorization` header.  Usually supplied through
    /// the `ORS_API_KEY` environment variable rather than the file.
    pub api_key: Option<String>,

    /// Per-request HTTP timeout.
    pub timeout_secs: u64,

    /// Stitch attempts per segment before the run fails as exhausted.
    pub max_attempts: u32,

    /// Wait after a 429 before any further routing call.
    pub rate_limit_backoff_secs: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openrouteservice.org/v2/directions/driving-car/geojson".into(),
            api_key: None,
            timeout_secs: 30,
            max_attempts: 100,
            rate_limit_backoff_secs: 10,
        }
    }
}

/// City boundary lookup endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub nominatim_url: String,
    pub polygons_url:  String,
    /// Nominatim rejects requests without an identifying agent.
    pub user_agent:    String,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            nominatim_url: "https://nominatim.openstreetmap.org".into(),
            polygons_url: "https://polygons.openstreetmap.fr".into(),
            user_agent: concat!("trajgen/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

/// Point sampler settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Rejection-sampling attempts per point.
    pub max_attempts: u32,

    /// Pick triangles proportional to their area instead of uniformly by
    /// index.  Off by default to keep the historical sampling law.
    pub area_weighted: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self { max_attempts: 10_000, area_weighted: false }
    }
}

/// Real-time mode settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    /// Wait resolution; every pacing wait is rounded up to a whole number of
    /// ticks.
    pub poll_tick_ms: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self { poll_tick_ms: 1_000 }
    }
}

impl GeneratorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        let config: GeneratorConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.routing.max_attempts == 0 {
            return Err(CoreError::Config("routing.max_attempts must be at least 1".into()));
        }
        if self.sampling.max_attempts == 0 {
            return Err(CoreError::Config("sampling.max_attempts must be at least 1".into()));
        }
        if self.realtime.poll_tick_ms == 0 {
            return Err(CoreError::Config("realtime.poll_tick_ms must be positive".into()));
        }
        if self.routing.endpoint.is_empty() {
            return Err(CoreError::Config("routing.endpoint is empty".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn rate_limit_backoff(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.routing.rate_limit_backoff_secs)
    }

    #[inline]
    pub fn poll_tick(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.realtime.poll_tick_ms)
    }
}
