//! Pure classification of routing responses.
//!
//! Kept free of I/O so every status/body combination can be tested without
//! a server.  The expected success body is a GeoJSON feature collection:
//!
//! ```text
//! { "type": "FeatureCollection",
//!   "features": [ { "type": "Feature",
//!                   "geometry":   { "type": "LineString", "coordinates": [[lon, lat], ...] },
//!                   "properties": { "summary": { "distance": 1234.5, "duration": 180.2 } } } ] }
//! ```
//!
//! `summary.duration` may be a number or a numeric string.

use geojson::{GeoJson, Value};

use tg_core::Coordinate;

use crate::{RoutingError, RoutingResult, Segment};

/// Longest error body quoted in an error message.
const MAX_QUOTED_BODY: usize = 200;

/// Map an HTTP status and body to a segment or an error class.
///
/// | Status  | Result                                  |
/// |---------|-----------------------------------------|
/// | 2xx     | [`parse_segment`]                       |
/// | 400     | [`RoutingError::Unroutable`]            |
/// | 429     | [`RoutingError::RateLimited`]           |
/// | other   | [`RoutingError::Unclassified`]          |
pub fn classify_response(status: u16, body: &str) -> RoutingResult<Segment> {
    match status {
        200..=299 => parse_segment(body),
        400 => Err(RoutingError::Unroutable(service_message(body))),
        429 => Err(RoutingError::RateLimited),
        _ => Err(RoutingError::Unclassified { status, message: service_message(body) }),
    }
}

/// Parse a successful response body into a [`Segment`].
pub fn parse_segment(body: &str) -> RoutingResult<Segment> {
    let doc: GeoJson = body
        .parse()
        .map_err(|e| malformed(format!("not GeoJSON: {e}")))?;
    let GeoJson::FeatureCollection(fc) = doc else {
        return Err(malformed("not a feature collection".into()));
    };
    let feature = fc
        .features
        .into_iter()
        .next()
        .ok_or_else(|| malformed("no features".into()))?;

    let duration_secs = feature
        .properties
        .as_ref()
        .and_then(|p| p.get("summary"))
        .and_then(|s| s.get("duration"))
        .and_then(parse_seconds)
        .ok_or_else(|| malformed("missing or unparsable summary.duration".into()))?;

    let geometry = feature
        .geometry
        .ok_or_else(|| malformed("first feature has no geometry".into()))?;
    let Value::LineString(positions) = geometry.value else {
        return Err(malformed("first feature is not a line".into()));
    };
    let coordinates = positions
        .iter()
        .map(|p| match p.as_slice() {
            [lon, lat, ..] => Some(Coordinate::new(*lon, *lat)),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| malformed("line position with fewer than two components".into()))?;
    if coordinates.is_empty() {
        return Err(malformed("empty line".into()));
    }

    Ok(Segment { coordinates, duration_secs })
}

/// Seconds as a JSON number or numeric string; finite and non-negative.
fn parse_seconds(v: &serde_json::Value) -> Option<f64> {
    let secs = match v {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}

/// The service's `error.message` if present, otherwise the (truncated) body.
fn service_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|v| {
        let err = v.get("error")?;
        match err {
            serde_json::Value::String(s) => Some(s.clone()),
            _ => err.get("message")?.as_str().map(str::to_owned),
        }
    });
    from_json.unwrap_or_else(|| body.chars().take(MAX_QUOTED_BODY).collect())
}

fn malformed(reason: String) -> RoutingError {
    RoutingError::MalformedResponse(reason)
}
