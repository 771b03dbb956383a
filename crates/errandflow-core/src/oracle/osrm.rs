//! OSRM-compatible HTTP routing client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::TravelOracle;
use crate::error::OracleError;
use crate::geo::GeoPoint;
use crate::timeline::RouteLeg;

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    duration: f64,
    #[serde(default)]
    distance: Option<f64>,
}

/// Queries `{base}/route/v1/{profile}/{lng},{lat};{lng},{lat}`.
pub struct OsrmOracle {
    base_url: Url,
    profile: String,
    http_client: Client,
}

impl OsrmOracle {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: &str, profile: impl Into<String>) -> Result<Self, OracleError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            profile: profile.into(),
            http_client: Client::new(),
        })
    }

    fn route_url(&self, from: GeoPoint, to: GeoPoint) -> Result<Url, OracleError> {
        let mut url = self.base_url.join(&format!(
            "route/v1/{}/{},{};{},{}",
            self.profile, from.lng, from.lat, to.lng, to.lat
        ))?;
        url.query_pairs_mut().append_pair("overview", "false");
        Ok(url)
    }
}

#[async_trait]
impl TravelOracle for OsrmOracle {
    fn name(&self) -> &str {
        "osrm"
    }

    async fn leg(&self, from: GeoPoint, to: GeoPoint) -> Result<RouteLeg, OracleError> {
        let url = self.route_url(from, to)?;
        let resp = self.http_client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(OracleError::Status {
                status: status.as_u16(),
            });
        }

        let body: RouteResponse = resp
            .json()
            .await
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;

        if body.code != "Ok" {
            let detail = body.message.unwrap_or(body.code);
            return Err(OracleError::NoRoute(detail));
        }

        let route = body
            .routes
            .first()
            .ok_or_else(|| OracleError::NoRoute("empty route list".into()))?;

        let leg = RouteLeg::new(route.duration);
        Ok(match route.distance {
            Some(meters) => leg.with_distance(meters),
            None => leg,
        })
    }
}
