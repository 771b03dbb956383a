//! Travel-time oracles.
//!
//! An oracle answers "how long from A to B" for one ordered pair of points.
//! Lookups happen before the timeline builder runs; the builder itself never
//! performs I/O.

mod fallback;
mod great_circle;
mod osrm;

use async_trait::async_trait;

use crate::error::OracleError;
use crate::geo::GeoPoint;
use crate::timeline::RouteLeg;

pub use fallback::FallbackOracle;
pub use great_circle::GreatCircleOracle;
pub use osrm::OsrmOracle;

/// Every travel-time source implements this trait.
#[async_trait]
pub trait TravelOracle: Send + Sync {
    /// Short identifier used in logs (e.g. "great_circle", "osrm").
    fn name(&self) -> &str;

    /// Travel estimate for the ordered pair `from -> to`.
    async fn leg(&self, from: GeoPoint, to: GeoPoint) -> Result<RouteLeg, OracleError>;
}
