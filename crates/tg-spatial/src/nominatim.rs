//! HTTP boundary resolver — enabled with the `http` Cargo feature.
//!
//! Two blocking requests per city:
//!
//! 1. `GET {nominatim}/search?format=geojson&limit=1&city={name}` — the first
//!    feature's `properties.osm_id` identifies the city relation.
//! 2. `GET {polygons}/get_geojson.py?id={osm_id}` — the relation's outline as
//!    a GeoJSON geometry collection.
//!
//! Any non-2xx answer, a search with no features, or an outline without
//! polygon area is reported as [`SpatialError::NotFound`].

use std::time::Duration;

use reqwest::blocking::Client;

use tg_core::BoundaryConfig;

use crate::{Boundary, BoundaryResolver, SpatialError, SpatialResult};

/// Resolves cities through Nominatim and the OSM polygon service.
pub struct NominatimResolver {
    client:        Client,
    nominatim_url: String,
    polygons_url:  String,
}

impl NominatimResolver {
    pub fn new(config: &BoundaryConfig) -> SpatialResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            nominatim_url: config.nominatim_url.trim_end_matches('/').to_owned(),
            polygons_url:  config.polygons_url.trim_end_matches('/').to_owned(),
        })
    }

    /// OSM id of the best match for `city`.
    fn osm_id(&self, city: &str) -> SpatialResult<String> {
        let url = format!("{}/search", self.nominatim_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("format", "geojson"), ("limit", "1"), ("city", city)])
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(not_found(city, format!("geocoder answered {status}")));
        }
        let body = resp.text()?;
        parse_osm_id(&body).ok_or_else(|| not_found(city, "geocoder returned no match".into()))
    }
}

impl BoundaryResolver for NominatimResolver {
    fn resolve(&self, city: &str) -> SpatialResult<Boundary> {
        let osm_id = self.osm_id(city)?;
        log::info!("city {city:?} is OSM object {osm_id}");

        let url = format!("{}/get_geojson.py", self.polygons_url);
        let resp = self.client.get(&url).query(&[("id", osm_id.as_str())]).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(not_found(city, format!("polygon service answered {status}")));
        }
        let body = resp.text()?;
        Boundary::from_geojson_str(&body).map_err(|e| match e {
            SpatialError::EmptyBoundary => not_found(city, "outline has no polygon area".into()),
            other => other,
        })
    }
}

/// Extract `features[0].properties.osm_id` from a Nominatim GeoJSON search
/// response.  The id may be encoded as a number or a string.
pub fn parse_osm_id(body: &str) -> Option<String> {
    let doc: serde_json::Value = serde_json::from_str(body).ok()?;
    let id = doc.get("features")?.get(0)?.get("properties")?.get("osm_id")?;
    match id {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn not_found(city: &str, reason: String) -> SpatialError {
    SpatialError::NotFound { city: city.to_owned(), reason }
}
