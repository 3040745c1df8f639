pub mod api_client;
pub mod config;
pub mod error;
pub mod guard;
pub mod metrics_handlers;
pub mod models;
pub mod rewards_handlers;
pub mod road_router;
pub mod routes_handlers;
pub mod session;
pub mod trips;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api_client::BackendClient;
use crate::config::Config;
use crate::error::GatewayError;
use crate::guard::InFlight;
use crate::road_router::{RoadRouter, RoadRouterConfig, RoadRouterError};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub road_router: Arc<RoadRouter>,
    pub in_flight: InFlight,
}

impl AppState {
    pub fn new(backend: BackendClient, road_router: RoadRouter) -> Self {
        Self {
            backend: Arc::new(backend),
            road_router: Arc::new(road_router),
            in_flight: InFlight::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let backend = BackendClient::new(&config.api_url, config.http_timeout())?;
        let road_router = RoadRouter::new(RoadRouterConfig {
            base_url: config.osrm_url.clone(),
            profile: config.osrm_profile.clone(),
            timeout: config.http_timeout(),
        })
        .map_err(RoadRouterError::from)?;
        Ok(Self::new(backend, road_router))
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/paths/normalize", post(metrics_handlers::normalize_path))
        .route("/api/metrics/trip", post(metrics_handlers::trip_metrics))
        .route(
            "/api/rewards/tiers/:points",
            get(rewards_handlers::tier_progress),
        )
        .route("/api/rewards/me", get(rewards_handlers::my_rewards))
        .route(
            "/api/routes",
            get(routes_handlers::list_routes).post(routes_handlers::save_route),
        )
        .route("/api/routes/:id", delete(routes_handlers::delete_route))
        .route(
            "/api/routes/:id/preview",
            get(routes_handlers::preview_route),
        )
        .route("/api/routes/:id/trips", post(trips::start_trip_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
