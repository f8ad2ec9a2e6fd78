//! OSRM HTTP adapter for route geometry.

use serde::Deserialize;

use crate::error::RouteError;
use crate::geo::GeoPoint;
use crate::traits::RouteService;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteService for OsrmClient {
    async fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Option<String>, RouteError> {
        let coords = format!(
            "{:.6},{:.6};{:.6},{:.6}",
            origin.longitude, origin.latitude, destination.longitude, destination.latitude
        );

        let url = format!(
            "{}/route/v1/{}/{}?overview=full&geometries=polyline",
            self.config.base_url, self.config.profile, coords
        );

        tracing::debug!(%url, "requesting route");

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<OsrmRouteResponse>()
            .await?;

        let geometry = body
            .routes
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|route| route.geometry);

        Ok(geometry)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: Option<String>,
}
