//! Nominatim-compatible search client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::LocationResolver;
use crate::error::ResolverError;
use crate::geo::{GeoPoint, Location};

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Looks up free-text places via `{base}/search?q=...&format=jsonv2&limit=1`.
pub struct NominatimResolver {
    base_url: Url,
    user_agent: String,
    http_client: Client,
}

impl NominatimResolver {
    pub fn new(base_url: &str, user_agent: impl Into<String>) -> Result<Self, ResolverError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            user_agent: user_agent.into(),
            http_client: Client::new(),
        })
    }

    fn search_url(&self, query: &str) -> Result<Url, ResolverError> {
        let mut url = self.base_url.join("search")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "jsonv2")
            .append_pair("limit", "1");
        Ok(url)
    }
}

fn parse_coordinate(raw: &str, field: &str) -> Result<f64, ResolverError> {
    raw.parse::<f64>()
        .map_err(|_| ResolverError::MalformedResponse(format!("{field} '{raw}' is not a number")))
}

#[async_trait]
impl LocationResolver for NominatimResolver {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn resolve(&self, query: &str) -> Result<Location, ResolverError> {
        let url = self.search_url(query)?;
        let resp = self
            .http_client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ResolverError::Status {
                status: status.as_u16(),
            });
        }

        let places: Vec<Place> = resp
            .json()
            .await
            .map_err(|e| ResolverError::MalformedResponse(e.to_string()))?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| ResolverError::NotFound(query.to_string()))?;

        let point = GeoPoint::new(
            parse_coordinate(&place.lat, "lat")?,
            parse_coordinate(&place.lon, "lon")?,
        );
        if !point.is_valid() {
            return Err(ResolverError::MalformedResponse(format!(
                "coordinates out of range: {}, {}",
                point.lat, point.lng
            )));
        }

        let location = Location::new(point);
        Ok(match place.display_name {
            Some(name) => location.with_address(name),
            None => location,
        })
    }
}
