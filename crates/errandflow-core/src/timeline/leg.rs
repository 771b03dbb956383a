//! Travel legs between consecutive stops.

use serde::{Deserialize, Serialize};

/// Travel segment arriving at a stop, from the previous stop or the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Estimated travel time from the oracle
    pub duration_seconds: f64,
    /// Routed or straight-line distance, when known
    #[serde(default)]
    pub distance_meters: Option<f64>,
}

impl RouteLeg {
    pub fn new(duration_seconds: f64) -> Self {
        Self {
            duration_seconds,
            distance_meters: None,
        }
    }

    pub fn with_distance(mut self, meters: f64) -> Self {
        self.distance_meters = Some(meters);
        self
    }

    /// Whole travel minutes, rounded up.
    pub fn travel_minutes(&self) -> i64 {
        travel_minutes(self.duration_seconds)
    }

    /// Whether the travel time is a finite, non-negative number
    pub fn is_valid(&self) -> bool {
        self.duration_seconds.is_finite() && self.duration_seconds >= 0.0
    }
}

/// Convert travel seconds to whole minutes, always rounding up.
///
/// Never under-estimates travel: 61 seconds is 2 minutes.
pub fn travel_minutes(seconds: f64) -> i64 {
    (seconds / 60.0).ceil() as i64
}
