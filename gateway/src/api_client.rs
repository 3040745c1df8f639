//! Client for the EcoRutas REST backend, which owns routes, users, point
//! totals and trip histories.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::models::{NewRoute, PointsUpdate, RouteRecord, TripHistory, UserRecord};
use crate::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("{resource}/{id} not found")]
    NotFound { resource: &'static str, id: u64 },
    #[error("backend answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("backend timed out: {0}")]
    Timeout(reqwest::Error),
    #[error("backend unreachable or sent an unreadable body: {0}")]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for ApiClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Http(err)
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /routes
    pub async fn list_routes(
        &self,
        session: Option<&Session>,
    ) -> Result<Vec<RouteRecord>, ApiClientError> {
        let response = self
            .send(self.request(Method::GET, "routes", session), None)
            .await?;
        let routes: Vec<RouteRecord> = response.json().await?;
        tracing::debug!("fetched {} routes", routes.len());
        Ok(routes)
    }

    /// GET /routes/:id
    pub async fn get_route(
        &self,
        id: u64,
        session: Option<&Session>,
    ) -> Result<RouteRecord, ApiClientError> {
        let path = format!("routes/{id}");
        self.fetch(self.request(Method::GET, &path, session), ("routes", id))
            .await
    }

    /// POST /routes
    pub async fn create_route(
        &self,
        route: &NewRoute,
        session: Option<&Session>,
    ) -> Result<RouteRecord, ApiClientError> {
        let request = self.request(Method::POST, "routes", session).json(route);
        let response = self.send(request, None).await?;
        let created: RouteRecord = response.json().await?;
        tracing::info!("route saved: {} (ID: {})", created.name, created.id);
        Ok(created)
    }

    /// DELETE /routes/:id
    pub async fn delete_route(
        &self,
        id: u64,
        session: Option<&Session>,
    ) -> Result<(), ApiClientError> {
        let path = format!("routes/{id}");
        self.send(
            self.request(Method::DELETE, &path, session),
            Some(("routes", id)),
        )
        .await?;
        tracing::info!("route deleted: ID {id}");
        Ok(())
    }

    /// GET /users/:id
    pub async fn get_user(
        &self,
        id: u64,
        session: Option<&Session>,
    ) -> Result<UserRecord, ApiClientError> {
        let path = format!("users/{id}");
        self.fetch(self.request(Method::GET, &path, session), ("users", id))
            .await
    }

    /// PATCH /users/:id with the new absolute point total.
    pub async fn update_points(
        &self,
        id: u64,
        points: u64,
        session: Option<&Session>,
    ) -> Result<(), ApiClientError> {
        let path = format!("users/{id}");
        let request = self
            .request(Method::PATCH, &path, session)
            .json(&PointsUpdate { points });
        let response = self.send(request, Some(("users", id))).await?;
        tracing::debug!("PATCH users/{id} -> {}", response.status());
        Ok(())
    }

    /// POST /trip-histories
    pub async fn create_trip_history(
        &self,
        trip: &TripHistory,
        session: Option<&Session>,
    ) -> Result<TripHistory, ApiClientError> {
        let request = self
            .request(Method::POST, "trip-histories", session)
            .json(trip);
        let response = self.send(request, None).await?;
        let created: TripHistory = response.json().await?;
        tracing::info!(
            "trip recorded for route {} ({} m, {} g CO2)",
            created.route_id,
            created.distance_m,
            created.co2_saved_g
        );
        Ok(created)
    }

    fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        let request = self
            .http
            .request(method, format!("{}/{}", self.base_url, path));
        match session {
            Some(session) => request.bearer_auth(&session.token),
            None => request,
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        target: (&'static str, u64),
    ) -> Result<T, ApiClientError> {
        let response = self.send(request, Some(target)).await?;
        Ok(response.json().await?)
    }

    /// Sends and turns non-success statuses into errors; a 404 on an
    /// identified resource becomes `NotFound`.
    async fn send(
        &self,
        request: RequestBuilder,
        target: Option<(&'static str, u64)>,
    ) -> Result<Response, ApiClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if let (StatusCode::NOT_FOUND, Some((resource, id))) = (status, target) {
            return Err(ApiClientError::NotFound { resource, id });
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("backend returned {status}: {body}");
        Err(ApiClientError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let client = BackendClient::new("http://localhost:3333/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3333");
    }
}
