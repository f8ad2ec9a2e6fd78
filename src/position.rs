//! Types pushed by the device location provider.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A single sample from the location provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub point: GeoPoint,
    /// Horizontal accuracy in meters, when the provider reports one.
    pub accuracy: Option<f32>,
    pub timestamp_ms: Option<i64>,
}

impl PositionSample {
    pub fn new(point: GeoPoint) -> Self {
        Self {
            point,
            accuracy: None,
            timestamp_ms: None,
        }
    }
}

/// Failure reported by the location provider instead of a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionError {
    pub code: PositionErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionErrorCode {
    PermissionDenied = 1,
    PositionUnavailable = 2,
    Timeout = 3,
}

/// Subscription tuning passed to the location provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    pub enable_high_accuracy: bool,
    /// Minimum displacement in meters between delivered samples.
    pub distance_filter_m: f64,
    pub interval_ms: u64,
    pub fastest_interval_ms: u64,
    /// Whether the OS shows its background-location indicator.
    pub shows_background_indicator: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            distance_filter_m: 10.0,
            interval_ms: 5000,
            fastest_interval_ms: 2000,
            shows_background_indicator: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_defaults() {
        let options = WatchOptions::default();
        assert!(options.enable_high_accuracy);
        assert_eq!(options.distance_filter_m, 10.0);
        assert_eq!(options.interval_ms, 5000);
        assert_eq!(options.fastest_interval_ms, 2000);
        assert!(options.shows_background_indicator);
    }
}
