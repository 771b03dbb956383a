//! Primary/fallback resolver composition.

use async_trait::async_trait;

use super::LocationResolver;
use crate::error::ResolverError;
use crate::geo::Location;

/// Tries the primary resolver, then the fallback on any error.
pub struct ChainedResolver {
    primary: Box<dyn LocationResolver>,
    fallback: Box<dyn LocationResolver>,
}

impl ChainedResolver {
    pub fn new(primary: Box<dyn LocationResolver>, fallback: Box<dyn LocationResolver>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl LocationResolver for ChainedResolver {
    fn name(&self) -> &str {
        "chained"
    }

    async fn resolve(&self, query: &str) -> Result<Location, ResolverError> {
        match self.primary.resolve(query).await {
            Ok(location) => Ok(location),
            Err(e) => {
                tracing::debug!(
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    "primary lookup for '{query}' failed: {e}"
                );
                self.fallback.resolve(query).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::resolve::GazetteerResolver;
    use std::collections::BTreeMap;

    fn gazetteer(name: &str, point: GeoPoint) -> Box<dyn LocationResolver> {
        let mut places = BTreeMap::new();
        places.insert(name.to_string(), point);
        Box::new(GazetteerResolver::new(places))
    }

    #[tokio::test]
    async fn primary_hit_short_circuits() {
        let chain = ChainedResolver::new(
            gazetteer("bakery", GeoPoint::new(1.0, 1.0)),
            gazetteer("bakery", GeoPoint::new(2.0, 2.0)),
        );
        let location = chain.resolve("bakery").await.unwrap();
        assert_eq!(location.point, GeoPoint::new(1.0, 1.0));
    }

    #[tokio::test]
    async fn primary_miss_falls_back() {
        let chain = ChainedResolver::new(
            gazetteer("bakery", GeoPoint::new(1.0, 1.0)),
            gazetteer("gym", GeoPoint::new(3.0, 3.0)),
        );
        let location = chain.resolve("gym").await.unwrap();
        assert_eq!(location.point, GeoPoint::new(3.0, 3.0));
        assert!(chain.resolve("pool").await.is_err());
    }
}
