//! OSRM HTTP adapter for road geometry between two points.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use shared::{GeoPoint, Path};

#[derive(Debug, thiserror::Error)]
pub enum RoadRouterError {
    #[error("routing service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("routing service returned no route")]
    NoRoute,
}

#[derive(Debug, Clone)]
pub struct RoadRouterConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout: Duration,
}

impl Default for RoadRouterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoadRouter {
    config: RoadRouterConfig,
    client: reqwest::Client,
}

impl RoadRouter {
    pub fn new(config: RoadRouterConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Simplified road geometry from `from` to `to`, in travel order.
    pub async fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<Path, RoadRouterError> {
        let url = format!(
            "{}/route/v1/{}/{:.7},{:.7};{:.7},{:.7}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.lon(),
            from.lat(),
            to.lon(),
            to.lat()
        );

        let body: OsrmRouteResponse = self
            .client
            .get(url)
            .query(&[("overview", "simplified"), ("geometries", "geojson")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let coordinates = body
            .routes
            .into_iter()
            .next()
            .map(|route| route.geometry.coordinates)
            .ok_or(RoadRouterError::NoRoute)?;

        let path = lon_lat_to_path(&coordinates);
        if path.is_empty() {
            return Err(RoadRouterError::NoRoute);
        }
        tracing::debug!("road route with {} points", path.len());
        Ok(path)
    }

    /// Like [`RoadRouter::route`], but a failure degrades to an empty path.
    pub async fn route_or_empty(&self, from: GeoPoint, to: GeoPoint) -> Path {
        match self.route(from, to).await {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!("road routing failed, showing no geometry: {err}");
                Path::empty()
            }
        }
    }
}

/// GeoJSON positions are always `[lon, lat]`, so the swap is explicit here
/// rather than guessed.
fn lon_lat_to_path(coordinates: &[Value]) -> Path {
    coordinates
        .iter()
        .filter_map(|position| {
            let lon = position.get(0)?.as_f64()?;
            let lat = position.get(1)?.as_f64()?;
            GeoPoint::new(lat, lon).ok()
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    #[serde(default)]
    coordinates: Vec<Value>,
}
