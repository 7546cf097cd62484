//! City boundary polygons and the resolver trait.
//!
//! # Pluggability
//!
//! The engine resolves a city name through the [`BoundaryResolver`] trait,
//! so the HTTP lookup ([`crate::NominatimResolver`]) can be swapped for the
//! offline [`FileResolver`] or a fixed polygon in tests.
//!
//! # Accepted GeoJSON
//!
//! Boundary documents may be a bare `Polygon` / `MultiPolygon`, a
//! `GeometryCollection` (what the OSM polygon service returns), a `Feature`
//! or a `FeatureCollection`.  Every polygon found is merged into one
//! `MultiPolygon`; points, lines and empty polygons are ignored.

use std::path::{Path, PathBuf};

use geo::{Contains, Geometry, MultiPolygon, Point, Polygon};
use geojson::GeoJson;

use tg_core::Coordinate;

use crate::{SpatialError, SpatialResult};

// ── Boundary ─────────────────────────────────────────────────────────────────

/// The geographic outline of a city.  Immutable for the lifetime of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    polygon: MultiPolygon<f64>,
}

impl Boundary {
    /// Wrap a multi-polygon.  Fails if it has no non-empty member.
    pub fn new(polygon: MultiPolygon<f64>) -> SpatialResult<Self> {
        let members: Vec<Polygon<f64>> = polygon
            .0
            .into_iter()
            .filter(|p| p.exterior().0.len() >= 4)
            .collect();
        if members.is_empty() {
            return Err(SpatialError::EmptyBoundary);
        }
        Ok(Self { polygon: MultiPolygon::new(members) })
    }

    /// Parse any of the accepted GeoJSON shapes (see module docs).
    pub fn from_geojson_str(s: &str) -> SpatialResult<Self> {
        let doc: GeoJson = s.parse()?;
        let mut polygons = Vec::new();
        match doc {
            GeoJson::Geometry(g) => collect_polygons(Geometry::try_from(g)?, &mut polygons),
            GeoJson::Feature(f) => {
                if let Some(g) = f.geometry {
                    collect_polygons(Geometry::try_from(g)?, &mut polygons);
                }
            }
            GeoJson::FeatureCollection(fc) => {
                for g in fc.features.into_iter().filter_map(|f| f.geometry) {
                    collect_polygons(Geometry::try_from(g)?, &mut polygons);
                }
            }
        }
        Self::new(MultiPolygon::new(polygons))
    }

    /// `true` if `c` lies inside the polygon (boundary points excluded).
    #[inline]
    pub fn contains(&self, c: Coordinate) -> bool {
        self.polygon.contains(&Point::from(c))
    }

    #[inline]
    pub fn polygon(&self) -> &MultiPolygon<f64> {
        &self.polygon
    }

    /// Number of member polygons.
    #[inline]
    pub fn part_count(&self) -> usize {
        self.polygon.0.len()
    }
}

fn collect_polygons(geometry: Geometry<f64>, out: &mut Vec<Polygon<f64>>) {
    match geometry {
        Geometry::Polygon(p) => out.push(p),
        Geometry::MultiPolygon(mp) => out.extend(mp.0),
        Geometry::GeometryCollection(gc) => {
            for g in gc.0 {
                collect_polygons(g, out);
            }
        }
        _ => {}
    }
}

// ── Resolver trait ───────────────────────────────────────────────────────────

/// Resolves a city name to its boundary polygon.
///
/// Called once per run, before any sampling.  A city that cannot be geocoded
/// or has no known boundary is [`SpatialError::NotFound`].
pub trait BoundaryResolver: Send + Sync {
    fn resolve(&self, city: &str) -> SpatialResult<Boundary>;
}

impl<R: BoundaryResolver + ?Sized> BoundaryResolver for Box<R> {
    fn resolve(&self, city: &str) -> SpatialResult<Boundary> {
        (**self).resolve(city)
    }
}

// ── FileResolver ─────────────────────────────────────────────────────────────

/// Offline resolver reading `{dir}/{city}.geojson`.
///
/// The city name is lower-cased and spaces become underscores, so
/// `"New York"` maps to `new_york.geojson`.
pub struct FileResolver {
    dir: PathBuf,
}

impl FileResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The file this resolver reads for `city`.
    pub fn path_for(&self, city: &str) -> PathBuf {
        let stem = city.trim().to_lowercase().replace(' ', "_");
        self.dir.join(format!("{stem}.geojson"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BoundaryResolver for FileResolver {
    fn resolve(&self, city: &str) -> SpatialResult<Boundary> {
        let path = self.path_for(city);
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SpatialError::NotFound {
                    city:   city.to_owned(),
                    reason: format!("{} does not exist", path.display()),
                });
            }
            Err(e) => return Err(e.into()),
        };
        log::debug!("read boundary for {city:?} from {}", path.display());
        Boundary::from_geojson_str(&text)
    }
}
