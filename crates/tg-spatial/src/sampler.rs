//! Random points inside a city boundary.
//!
//! # Sampling law
//!
//! 1. Pick a triangle.  [`TriangleSelection::Uniform`] picks by index with
//!    equal probability, regardless of area, so small triangles are
//!    oversampled relative to their share of the city.  This is the
//!    historical behavior and the default.  [`TriangleSelection::AreaWeighted`]
//!    picks proportionally to area instead.
//! 2. Draw weights `x ~ U(0,1)`, `y = U(0,1) * (1 - x)`, `w = 1 - x - y` and
//!    combine the vertices as `x*v0 + y*v1 + w*v2`.  The weights are not the
//!    textbook uniform-in-triangle law; points bunch toward `v0`.
//! 3. Reject the point and start over if the boundary does not contain it.
//!    Rejections happen on triangle edges that coincide with the polygon
//!    outline.  The loop gives up after `max_attempts`.

use geo::Coord;
use rand::distributions::{Distribution, WeightedIndex};

use tg_core::{Coordinate, VehicleRng};

use crate::{Boundary, SpatialError, SpatialResult, TriangleSet};

/// How [`PointSampler`] picks a triangle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TriangleSelection {
    /// Every triangle equally likely.
    #[default]
    Uniform,
    /// Probability proportional to triangle area.
    AreaWeighted,
}

/// Samples coordinates inside a boundary via its triangle decomposition.
///
/// Holds no RNG: callers pass their own [`VehicleRng`], so one sampler can be
/// shared (`Arc`) by every engine of a fleet.
pub struct PointSampler {
    boundary:     Boundary,
    triangles:    TriangleSet,
    weights:      Option<WeightedIndex<f64>>,
    max_attempts: u32,
}

impl PointSampler {
    pub fn new(
        boundary:     Boundary,
        triangles:    TriangleSet,
        selection:    TriangleSelection,
        max_attempts: u32,
    ) -> SpatialResult<Self> {
        let weights = match selection {
            TriangleSelection::Uniform => None,
            TriangleSelection::AreaWeighted => Some(
                WeightedIndex::new(triangles.areas())
                    .map_err(|_| SpatialError::EmptyTriangulation)?,
            ),
        };
        Ok(Self {
            boundary,
            triangles,
            weights,
            max_attempts: max_attempts.max(1),
        })
    }

    #[inline]
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    #[inline]
    pub fn triangles(&self) -> &TriangleSet {
        &self.triangles
    }

    /// A coordinate strictly inside the boundary.
    ///
    /// # Errors
    ///
    /// [`SpatialError::SamplingExhausted`] if `max_attempts` candidates in a
    /// row fell outside the boundary.
    pub fn sample(&self, rng: &mut VehicleRng) -> SpatialResult<Coordinate> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.candidate(rng);
            if self.boundary.contains(candidate) {
                if attempt > 1 {
                    log::trace!("sampled {candidate} after {attempt} attempts");
                }
                return Ok(candidate);
            }
        }
        Err(SpatialError::SamplingExhausted { attempts: self.max_attempts })
    }

    /// One unchecked candidate: triangle choice plus barycentric combination.
    fn candidate(&self, rng: &mut VehicleRng) -> Coordinate {
        let index = match &self.weights {
            Some(w) => w.sample(rng.inner()),
            None => rng.gen_range(0..self.triangles.len()),
        };
        let [v0, v1, v2] = self.triangles.triangles()[index].to_array();
        let [x, y, w] = barycentric_weights(rng);
        combine([v0, v1, v2], [x, y, w])
    }
}

/// Weights `[x, y, w]` with `x ~ U(0,1)`, `y = U(0,1) * (1 - x)` and
/// `w = 1 - x - y`.  All three lie in `[0, 1]` and sum to 1.
pub fn barycentric_weights(rng: &mut VehicleRng) -> [f64; 3] {
    let x: f64 = rng.random();
    let rest = 1.0 - x;
    let y = rng.random::<f64>() * rest;
    // `rest - y` rather than `1 - x - y`: never negative after rounding.
    let w = rest - y;
    [x, y, w]
}

/// Weighted combination of three vertices.
pub fn combine(vertices: [Coord<f64>; 3], weights: [f64; 3]) -> Coordinate {
    let [v0, v1, v2] = vertices;
    let [x, y, w] = weights;
    Coordinate::new(
        v0.x * x + v1.x * y + v2.x * w,
        v0.y * x + v1.y * y + v2.y * w,
    )
}
