//! Routing error classes.

use thiserror::Error;

/// Outcome classes of a failed routing call.
///
/// Every class is recoverable from the engine's point of view; they differ
/// only in what happens before the next attempt (see [`RoutingError::is_rate_limited`]).
#[derive(Debug, Error)]
pub enum RoutingError {
    /// HTTP 400: the service cannot connect these two points by road.
    #[error("points cannot be routed: {0}")]
    Unroutable(String),

    /// HTTP 429: back off before any further call.
    #[error("routing service rate limit reached")]
    RateLimited,

    /// 2xx answer without a usable line geometry or duration.
    #[error("malformed routing response: {0}")]
    MalformedResponse(String),

    /// Any other non-2xx status.
    #[error("routing service answered {status}: {message}")]
    Unclassified { status: u16, message: String },

    #[cfg(feature = "http")]
    #[error("routing transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RoutingError {
    #[inline]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RoutingError::RateLimited)
    }

    /// Short stable label, used in log lines and attempt statistics.
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingError::Unroutable(_)        => "unroutable",
            RoutingError::RateLimited          => "rate_limited",
            RoutingError::MalformedResponse(_) => "malformed",
            RoutingError::Unclassified { .. }  => "unclassified",
            #[cfg(feature = "http")]
            RoutingError::Transport(_)         => "transport",
        }
    }
}

pub type RoutingResult<T> = Result<T, RoutingError>;
