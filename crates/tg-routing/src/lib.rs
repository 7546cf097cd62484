//! `tg-routing` — road routing between two sampled points.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`router`]   | `Router` trait, `Segment`                                    |
//! | [`response`] | `classify_response`, `parse_segment` (pure, no I/O)          |
//! | [`ors`]      | `OrsRouter` — OpenRouteService client (feature = `"http"`)   |
//! | [`gate`]     | `RateLimitGate` — backoff state shared across engines        |
//! | [`error`]    | `RoutingError`, `RoutingResult<T>`                           |
//!
//! # Failure model
//!
//! A single routing call either yields a [`Segment`] or one of the
//! [`RoutingError`] classes.  This crate never retries; the engine owns the
//! retry policy and decides what each class means for the next attempt.

pub mod error;
pub mod gate;
pub mod response;
pub mod router;

#[cfg(feature = "http")]
pub mod ors;


pub use error::{RoutingError, RoutingResult};
pub use gate::RateLimitGate;
pub use response::{classify_response, parse_segment};
pub use router::{Router, Segment};

#[cfg(feature = "http")]
pub use ors::OrsRouter;
