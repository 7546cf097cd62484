//! Polygon triangulation.
//!
//! The sampler only needs *some* set of non-overlapping triangles whose
//! union covers the boundary; it does not care how they were produced.  The
//! default [`EarcutTriangulator`] uses `geo`'s ear-clipping implementation,
//! which handles holes (lakes, enclaves) in each member polygon.

use geo::{Area, Triangle, TriangulateEarcut};

use crate::{Boundary, SpatialError, SpatialResult};

// ── TriangleSet ──────────────────────────────────────────────────────────────

/// Decomposition of a boundary into triangles.  Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleSet {
    triangles: Vec<Triangle<f64>>,
}

impl TriangleSet {
    /// Keep the triangles with positive area.  Fails if none remain.
    pub fn new(triangles: Vec<Triangle<f64>>) -> SpatialResult<Self> {
        let triangles: Vec<_> = triangles
            .into_iter()
            .filter(|t| t.unsigned_area() > 0.0)
            .collect();
        if triangles.is_empty() {
            return Err(SpatialError::EmptyTriangulation);
        }
        Ok(Self { triangles })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle<f64>] {
        &self.triangles
    }

    /// Unsigned area of each triangle, in square degrees.
    pub fn areas(&self) -> Vec<f64> {
        self.triangles.iter().map(|t| t.unsigned_area()).collect()
    }
}

// ── Triangulator trait ───────────────────────────────────────────────────────

/// Splits a boundary into a [`TriangleSet`].
///
/// Implementations must be deterministic: the same boundary always yields
/// the same triangles in the same order, so seeded runs are reproducible.
pub trait Triangulator: Send + Sync {
    fn triangulate(&self, boundary: &Boundary) -> SpatialResult<TriangleSet>;
}

// ── EarcutTriangulator ───────────────────────────────────────────────────────

/// Ear-clipping triangulation of every member polygon.
pub struct EarcutTriangulator;

impl Triangulator for EarcutTriangulator {
    fn triangulate(&self, boundary: &Boundary) -> SpatialResult<TriangleSet> {
        let triangles: Vec<Triangle<f64>> = boundary
            .polygon()
            .0
            .iter()
            .flat_map(|p| p.earcut_triangles())
            .collect();
        log::debug!(
            "triangulated {} polygon(s) into {} triangles",
            boundary.part_count(),
            triangles.len()
        );
        TriangleSet::new(triangles)
    }
}
