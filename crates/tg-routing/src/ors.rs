//! OpenRouteService client — enabled with the `http` Cargo feature.
//!
//! `POST {endpoint}` with body `{"coordinates": [[lon,lat],[lon,lat]]}` and
//! the API key in the `Authorization` header.  The endpoint defaults to the
//! `driving-car` GeoJSON directions route.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Serialize;

use tg_core::{Coordinate, RoutingConfig};

use crate::{Router, RoutingResult, Segment, classify_response};

/// Request body of the directions endpoint.
#[derive(Debug, Serialize)]
pub struct DirectionsRequest {
    pub coordinates: [[f64; 2]; 2],
}

impl DirectionsRequest {
    pub fn new(from: Coordinate, to: Coordinate) -> Self {
        Self { coordinates: [from.to_lon_lat(), to.to_lon_lat()] }
    }
}

/// Blocking OpenRouteService directions client.
pub struct OrsRouter {
    client:   Client,
    endpoint: String,
    api_key:  String,
}

impl OrsRouter {
    pub fn new(config: &RoutingConfig, api_key: impl Into<String>) -> RoutingResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.into(),
        })
    }
}

impl Router for OrsRouter {
    fn route(&self, from: Coordinate, to: Coordinate) -> RoutingResult<Segment> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, &self.api_key)
            .header(ACCEPT, "application/json, application/geo+json; charset=utf-8")
            .json(&DirectionsRequest::new(from, to))
            .send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        log::trace!("routing {from} -> {to}: HTTP {status}, {} bytes", body.len());
        classify_response(status, &body)
    }
}
