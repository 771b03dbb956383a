//! Static name-to-point lookup.

use async_trait::async_trait;
use std::collections::BTreeMap;

use super::LocationResolver;
use crate::error::ResolverError;
use crate::geo::{GeoPoint, Location};

/// Resolves queries against a fixed table of known places.
///
/// Matching ignores case and surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct GazetteerResolver {
    places: BTreeMap<String, (String, GeoPoint)>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl GazetteerResolver {
    pub fn new(places: BTreeMap<String, GeoPoint>) -> Self {
        let places = places
            .into_iter()
            .map(|(name, point)| (normalize(&name), (name, point)))
            .collect();
        Self { places }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn lookup(&self, query: &str) -> Option<Location> {
        self.places
            .get(&normalize(query))
            .map(|(name, point)| Location::new(*point).with_address(name.clone()))
    }
}

#[async_trait]
impl LocationResolver for GazetteerResolver {
    fn name(&self) -> &str {
        "gazetteer"
    }

    async fn resolve(&self, query: &str) -> Result<Location, ResolverError> {
        self.lookup(query)
            .ok_or_else(|| ResolverError::NotFound(query.to_string()))
    }
}
