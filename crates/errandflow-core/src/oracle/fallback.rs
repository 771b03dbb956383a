//! Primary/fallback oracle composition.

use async_trait::async_trait;

use super::TravelOracle;
use crate::error::OracleError;
use crate::geo::GeoPoint;
use crate::timeline::RouteLeg;

/// Asks the primary oracle first and falls back on any primary error.
pub struct FallbackOracle {
    primary: Box<dyn TravelOracle>,
    fallback: Box<dyn TravelOracle>,
}

impl FallbackOracle {
    pub fn new(primary: Box<dyn TravelOracle>, fallback: Box<dyn TravelOracle>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl TravelOracle for FallbackOracle {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn leg(&self, from: GeoPoint, to: GeoPoint) -> Result<RouteLeg, OracleError> {
        match self.primary.leg(from, to).await {
            Ok(leg) => Ok(leg),
            Err(e) => {
                tracing::warn!(
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    "travel lookup failed, using fallback: {e}"
                );
                self.fallback.leg(from, to).await
            }
        }
    }
}
