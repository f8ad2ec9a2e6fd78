//! Route-fetch failure taxonomy.
//!
//! Every variant is recoverable: the policy keeps the last known good route
//! and re-qualifies on the next position update. Supersession of a stale
//! request is not an error and never appears here.

use thiserror::Error;

use crate::polyline::PolylineError;

/// Why a route fetch produced no usable route.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Network or HTTP failure reaching the routing service.
    #[error("route request failed: {0}")]
    Transport(String),
    /// Well-formed response without usable geometry.
    #[error("routing service returned no usable route")]
    EmptyRoute,
    /// The returned geometry could not be decoded.
    #[error("route geometry could not be decoded: {0}")]
    Decode(#[from] PolylineError),
}

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        RouteError::Transport(err.to_string())
    }
}
