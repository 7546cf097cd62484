//! Unit tests for tg-spatial.
//!
//! All tests use hand-written polygons so they run without network access.

#[cfg(test)]
mod helpers {
    use geo::{Coord, MultiPolygon, Triangle, polygon};

    use crate::{Boundary, TriangleSet};

    /// Unit square with lower-left corner at (13.0, 52.0).
    pub fn square() -> Boundary {
        let p = polygon![
            (x: 13.0, y: 52.0),
            (x: 14.0, y: 52.0),
            (x: 14.0, y: 53.0),
            (x: 13.0, y: 53.0),
        ];
        Boundary::new(MultiPolygon::new(vec![p])).unwrap()
    }

    /// The square split into 4 triangles fanning out from its centre.
    pub fn square_fan() -> TriangleSet {
        let c = Coord { x: 13.5, y: 52.5 };
        let corners = [
            Coord { x: 13.0, y: 52.0 },
            Coord { x: 14.0, y: 52.0 },
            Coord { x: 14.0, y: 53.0 },
            Coord { x: 13.0, y: 53.0 },
        ];
        let tris = (0..4)
            .map(|i| Triangle::new(c, corners[i], corners[(i + 1) % 4]))
            .collect();
        TriangleSet::new(tris).unwrap()
    }

    pub const SQUARE_GEOMETRY_COLLECTION: &str = r#"{
        "type": "GeometryCollection",
        "geometries": [{
            "type": "MultiPolygon",
            "coordinates": [[[[13.0,52.0],[14.0,52.0],[14.0,53.0],[13.0,53.0],[13.0,52.0]]]]
        }]
    }"#;
}

// ── Boundary ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod boundary {
    use geo::MultiPolygon;
    use tg_core::Coordinate;

    use super::helpers::*;
    use crate::{Boundary, SpatialError};

    #[test]
    fn contains_interior_not_exterior() {
        let b = square();
        assert!(b.contains(Coordinate::new(13.5, 52.5)));
        assert!(!b.contains(Coordinate::new(12.5, 52.5)));
        // Points on the outline are not strictly inside.
        assert!(!b.contains(Coordinate::new(13.0, 52.5)));
    }

    #[test]
    fn parses_geometry_collection() {
        let b = Boundary::from_geojson_str(SQUARE_GEOMETRY_COLLECTION).unwrap();
        assert_eq!(b, square());
    }

    #[test]
    fn parses_feature_collection_of_polygons() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Polygon",
                   "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Point", "coordinates": [5,5]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Polygon",
                   "coordinates": [[[2,2],[3,2],[3,3],[2,3],[2,2]]]}}
            ]
        }"#;
        let b = Boundary::from_geojson_str(doc).unwrap();
        assert_eq!(b.part_count(), 2);
        assert!(b.contains(Coordinate::new(2.5, 2.5)));
    }

    #[test]
    fn point_only_document_is_empty() {
        let doc = r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#;
        assert!(matches!(Boundary::from_geojson_str(doc), Err(SpatialError::EmptyBoundary)));
    }

    #[test]
    fn invalid_json_is_geojson_error() {
        assert!(matches!(Boundary::from_geojson_str("{"), Err(SpatialError::GeoJson(_))));
    }

    #[test]
    fn empty_multipolygon_rejected() {
        assert!(Boundary::new(MultiPolygon::new(vec![])).is_err());
    }
}

// ── FileResolver ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod file_resolver {
    use super::helpers::*;
    use crate::{BoundaryResolver, FileResolver, SpatialError};

    #[test]
    fn path_normalises_city_name() {
        let r = FileResolver::new("/data");
        assert_eq!(r.path_for(" New York "), std::path::Path::new("/data/new_york.geojson"));
    }

    #[test]
    fn resolves_existing_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(dir.path().join("berlin.geojson"), SQUARE_GEOMETRY_COLLECTION).unwrap();
        let b = FileResolver::new(dir.path()).resolve("Berlin").unwrap();
        assert_eq!(b, square());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = FileResolver::new(dir.path()).resolve("Atlantis").unwrap_err();
        assert!(matches!(err, SpatialError::NotFound { ref city, .. } if city == "Atlantis"));
    }
}

// ── Nominatim response parsing ───────────────────────────────────────────────

#[cfg(all(test, feature = "http"))]
mod nominatim {
    use crate::nominatim::parse_osm_id;

    #[test]
    fn numeric_osm_id() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"osm_id":62422,"osm_type":"relation"},
             "geometry":{"type":"Point","coordinates":[13.4,52.5]}}]}"#;
        assert_eq!(parse_osm_id(body).as_deref(), Some("62422"));
    }

    #[test]
    fn string_osm_id() {
        let body = r#"{"features":[{"properties":{"osm_id":"62422"}}]}"#;
        assert_eq!(parse_osm_id(body).as_deref(), Some("62422"));
    }

    #[test]
    fn no_features() {
        assert_eq!(parse_osm_id(r#"{"type":"FeatureCollection","features":[]}"#), None);
        assert_eq!(parse_osm_id("not json"), None);
    }
}

// ── Triangulation ────────────────────────────────────────────────────────────

#[cfg(test)]
mod triangulate {
    use geo::{Area, Coord, Triangle};

    use super::helpers::*;
    use crate::{EarcutTriangulator, SpatialError, TriangleSet, Triangulator};

    #[test]
    fn square_covers_its_area() {
        let b = square();
        let set = EarcutTriangulator.triangulate(&b).unwrap();
        assert_eq!(set.len(), 2);
        let total: f64 = set.areas().iter().sum();
        assert!((total - b.polygon().unsigned_area()).abs() < 1e-9);
    }

    #[test]
    fn deterministic() {
        let b = square();
        let a = EarcutTriangulator.triangulate(&b).unwrap();
        let c = EarcutTriangulator.triangulate(&b).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn degenerate_triangles_dropped() {
        let flat = Triangle::new(
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 2.0, y: 0.0 },
        );
        assert!(matches!(TriangleSet::new(vec![flat]), Err(SpatialError::EmptyTriangulation)));
    }
}

// ── Sampler ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sampler {
    use geo::{Coord, MultiPolygon, polygon};
    use tg_core::{Coordinate, VehicleId, VehicleRng};

    use super::helpers::*;
    use crate::sampler::{barycentric_weights, combine};
    use crate::{Boundary, PointSampler, SpatialError, TriangleSelection};

    fn rng() -> VehicleRng {
        VehicleRng::new(7, VehicleId(1))
    }

    #[test]
    fn weights_sum_to_one_and_stay_in_unit_interval() {
        let mut rng = rng();
        for _ in 0..10_000 {
            let w = barycentric_weights(&mut rng);
            assert!(w.iter().all(|v| (0.0..=1.0).contains(v)), "{w:?}");
            assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12, "{w:?}");
        }
    }

    #[test]
    fn combine_uses_first_weight_for_first_vertex() {
        let v = [
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: 0.0, y: 10.0 },
        ];
        assert_eq!(combine(v, [1.0, 0.0, 0.0]), Coordinate::new(0.0, 0.0));
        assert_eq!(combine(v, [0.0, 0.5, 0.5]), Coordinate::new(5.0, 5.0));
    }

    #[test]
    fn samples_always_inside_boundary() {
        for selection in [TriangleSelection::Uniform, TriangleSelection::AreaWeighted] {
            let sampler = PointSampler::new(square(), square_fan(), selection, 1_000).unwrap();
            let mut rng = rng();
            for _ in 0..2_000 {
                let p = sampler.sample(&mut rng).unwrap();
                assert!(sampler.boundary().contains(p), "{p} escaped the square");
            }
        }
    }

    #[test]
    fn same_seed_same_points() {
        let sampler = PointSampler::new(square(), square_fan(), TriangleSelection::Uniform, 100).unwrap();
        let mut a = rng();
        let mut b = rng();
        for _ in 0..50 {
            assert_eq!(sampler.sample(&mut a).unwrap(), sampler.sample(&mut b).unwrap());
        }
    }

    #[test]
    fn every_triangle_gets_sampled() {
        // Uniform-by-index selection must reach the last triangle too.
        let sampler = PointSampler::new(square(), square_fan(), TriangleSelection::Uniform, 100).unwrap();
        let mut rng = rng();
        let mut quadrants = [false; 4];
        for _ in 0..500 {
            let p = sampler.sample(&mut rng).unwrap();
            let (dx, dy) = (p.lon - 13.5, p.lat - 52.5);
            let q = if dy.abs() > dx.abs() {
                if dy < 0.0 { 0 } else { 2 }
            } else if dx > 0.0 { 1 } else { 3 };
            quadrants[q] = true;
        }
        assert_eq!(quadrants, [true; 4]);
    }

    #[test]
    fn gives_up_when_triangles_miss_boundary() {
        // Triangles entirely outside the boundary: every candidate is rejected.
        let far = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ];
        let boundary = Boundary::new(MultiPolygon::new(vec![far])).unwrap();
        let sampler = PointSampler::new(boundary, square_fan(), TriangleSelection::Uniform, 25).unwrap();
        let err = sampler.sample(&mut rng()).unwrap_err();
        assert!(matches!(err, SpatialError::SamplingExhausted { attempts: 25 }));
    }
}
