//! `tg-spatial` — city boundaries, triangulation, and point sampling.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`boundary`]    | `Boundary`, `BoundaryResolver` trait, `FileResolver`      |
//! | [`nominatim`]   | `NominatimResolver` (feature = `"http"` only)             |
//! | [`triangulate`] | `TriangleSet`, `Triangulator` trait, `EarcutTriangulator` |
//! | [`sampler`]     | `PointSampler`, `TriangleSelection`, barycentric weights  |
//! | [`error`]       | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag   | Effect                                                        |
//! |--------|---------------------------------------------------------------|
//! | `http` | Enables the Nominatim resolver via `reqwest` (on by default). |

pub mod boundary;
pub mod error;
pub mod sampler;
pub mod triangulate;

#[cfg(feature = "http")]
pub mod nominatim;

#[cfg(test)]
mod tests;

pub use boundary::{Boundary, BoundaryResolver, FileResolver};
pub use error::{SpatialError, SpatialResult};
pub use sampler::{PointSampler, TriangleSelection};
pub use triangulate::{EarcutTriangulator, TriangleSet, Triangulator};

#[cfg(feature = "http")]
pub use nominatim::NominatimResolver;
