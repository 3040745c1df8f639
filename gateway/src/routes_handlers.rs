// Handlers for the saved-route endpoints. Storage lives in the EcoRutas
// backend; these compute the numbers and keep their shape consistent.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{display_km, normalize, preferred_distance_m, TransportMode, TripMetrics};

use crate::error::GatewayError;
use crate::guard::Submission;
use crate::models::{
    NewRoute, RoutePreview, RouteRecord, RouteSummary, SaveRouteRequest, SavedRouteResponse,
};
use crate::road_router::RoadRouterError;
use crate::session::Session;
use crate::AppState;

/// GET /api/routes - List saved routes with normalized paths
pub async fn list_routes(
    State(state): State<AppState>,
    session: Option<Session>,
) -> Result<Json<Vec<RouteSummary>>, GatewayError> {
    let routes = state.backend.list_routes(session.as_ref()).await?;
    Ok(Json(routes.into_iter().map(RouteSummary::from).collect()))
}

/// POST /api/routes - Measure the road route between two points and save it
pub async fn save_route(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SaveRouteRequest>,
) -> Result<(StatusCode, Json<SavedRouteResponse>), GatewayError> {
    let _guard = state
        .in_flight
        .try_acquire(session.user_id, Submission::SaveRoute)
        .ok_or(GatewayError::SubmissionInFlight(Submission::SaveRoute))?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(GatewayError::Validation("route name is required".into()));
    }
    let mode: TransportMode = req.mode.parse()?;

    let road_path = state
        .road_router
        .route(req.origin, req.destination)
        .await
        .map_err(|err| {
            tracing::warn!("no road geometry for new route {name:?}: {err}");
            match err {
                RoadRouterError::NoRoute => GatewayError::NoRoadRoute,
                other => GatewayError::RoadRouter(other),
            }
        })?;
    let metrics = TripMetrics::for_path(&road_path, mode);

    // Only the endpoints are persisted; the geometry is re-fetched on preview.
    let endpoints = shared::Path::new(vec![req.origin, req.destination]);
    let description = req
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Eco-friendly route - {mode}"));

    let new_route = NewRoute {
        name: name.to_string(),
        description,
        mode,
        path: endpoints.to_json_string()?,
        distance_m: metrics.distance_m,
        co2_saved_kg: metrics.co2_saved_kg,
        created_by: session.user_id,
    };
    let route = state
        .backend
        .create_route(&new_route, Some(&session))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SavedRouteResponse {
            route,
            road_path,
            metrics,
        }),
    ))
}

/// DELETE /api/routes/:id
pub async fn delete_route(
    State(state): State<AppState>,
    session: Option<Session>,
    Path(id): Path<u64>,
) -> Result<StatusCode, GatewayError> {
    state.backend.delete_route(id, session.as_ref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/routes/:id/preview - Road geometry and distance for the map
pub async fn preview_route(
    State(state): State<AppState>,
    session: Option<Session>,
    Path(id): Path<u64>,
) -> Result<Json<RoutePreview>, GatewayError> {
    let record = state.backend.get_route(id, session.as_ref()).await?;
    let path = normalize(&record.path);
    let (origin, destination) = path.endpoints().ok_or_else(|| {
        tracing::warn!("route {id} has an unusable path: {}", record.path);
        GatewayError::InvalidRoutePath(id)
    })?;

    let road_path = state.road_router.route_or_empty(origin, destination).await;
    let shown_m = preferred_distance_m(record.distance_m, || {
        if road_path.len() >= 2 {
            road_path.length_m()
        } else {
            origin.distance_to(destination)
        }
    });

    let trip_metrics = record
        .mode
        .parse::<TransportMode>()
        .ok()
        .map(|mode| TripMetrics::for_distance(trip_distance_m(&record, &path), mode));

    Ok(Json(RoutePreview {
        route_id: id,
        origin,
        destination,
        distance_km: display_km(shown_m),
        road_path,
        trip_metrics,
    }))
}

/// Distance a trip on this route is credited with: the backend's recorded
/// distance, or the straight line between the path's endpoints.
pub fn trip_distance_m(record: &RouteRecord, path: &shared::Path) -> f64 {
    preferred_distance_m(record.distance_m, || {
        path.endpoints()
            .map(|(start, end)| start.distance_to(end))
            .unwrap_or(0.0)
    })
}
