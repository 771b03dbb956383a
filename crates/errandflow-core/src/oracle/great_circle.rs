//! Geometric travel approximation.

use async_trait::async_trait;

use super::TravelOracle;
use crate::error::{OracleError, ValidationError};
use crate::geo::GeoPoint;
use crate::timeline::RouteLeg;

/// Estimates travel as great-circle distance stretched by a detour factor and
/// driven at a constant average speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreatCircleOracle {
    average_speed_kmh: f64,
    detour_factor: f64,
}

impl GreatCircleOracle {
    /// # Errors
    ///
    /// Returns an error unless the speed is positive and the detour factor is
    /// at least 1.
    pub fn new(average_speed_kmh: f64, detour_factor: f64) -> Result<Self, ValidationError> {
        if !(average_speed_kmh.is_finite() && average_speed_kmh > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: "average_speed_kmh".into(),
                message: format!("must be a positive number, got {average_speed_kmh}"),
            });
        }
        if !(detour_factor.is_finite() && detour_factor >= 1.0) {
            return Err(ValidationError::InvalidValue {
                field: "detour_factor".into(),
                message: format!("must be at least 1.0, got {detour_factor}"),
            });
        }
        Ok(Self {
            average_speed_kmh,
            detour_factor,
        })
    }

    pub fn estimate(&self, from: GeoPoint, to: GeoPoint) -> RouteLeg {
        let meters = from.distance_to(&to) * self.detour_factor;
        let meters_per_second = self.average_speed_kmh * 1000.0 / 3600.0;
        RouteLeg::new(meters / meters_per_second).with_distance(meters)
    }
}

impl Default for GreatCircleOracle {
    /// 30 km/h urban average, 1.3 detour
    fn default() -> Self {
        Self {
            average_speed_kmh: 30.0,
            detour_factor: 1.3,
        }
    }
}

#[async_trait]
impl TravelOracle for GreatCircleOracle {
    fn name(&self) -> &str {
        "great_circle"
    }

    async fn leg(&self, from: GeoPoint, to: GeoPoint) -> Result<RouteLeg, OracleError> {
        Ok(self.estimate(from, to))
    }
}
