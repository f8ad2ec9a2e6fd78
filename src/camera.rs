//! Map camera region.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Span shown before the first position arrives.
const INITIAL_SPAN_DEG: f64 = 0.05;

/// Tighter span used once the camera follows the user.
const FOLLOW_SPAN_DEG: f64 = 0.01;

/// A rectangular map viewport: center plus latitude/longitude spans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: GeoPoint,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    /// Region shown until a position is known.
    pub const INITIAL: Region = Region {
        center: GeoPoint::new(37.78825, -122.4324),
        latitude_delta: INITIAL_SPAN_DEG,
        longitude_delta: INITIAL_SPAN_DEG,
    };

    /// Region centered on the user once tracking delivers positions.
    pub fn follow(center: GeoPoint) -> Region {
        Region {
            center,
            latitude_delta: FOLLOW_SPAN_DEG,
            longitude_delta: FOLLOW_SPAN_DEG,
        }
    }
}
