//! Starting a trip: record it in the trip history, then credit the user's
//! points.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use shared::{normalize, TransportMode, TripMetrics};

use crate::api_client::BackendClient;
use crate::error::GatewayError;
use crate::guard::Submission;
use crate::models::{PointsAward, TripHistory, TripReceipt};
use crate::routes_handlers::trip_distance_m;
use crate::session::Session;
use crate::AppState;

/// POST /api/routes/:id/trips
pub async fn start_trip_handler(
    State(state): State<AppState>,
    session: Session,
    Path(route_id): Path<u64>,
) -> Result<(StatusCode, Json<TripReceipt>), GatewayError> {
    let receipt = start_trip(&state, &session, route_id).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn start_trip(
    state: &AppState,
    session: &Session,
    route_id: u64,
) -> Result<TripReceipt, GatewayError> {
    let _guard = state
        .in_flight
        .try_acquire(session.user_id, Submission::StartTrip)
        .ok_or(GatewayError::SubmissionInFlight(Submission::StartTrip))?;

    let route = state.backend.get_route(route_id, Some(session)).await?;
    let path = normalize(&route.path);
    let (start, end) = path
        .endpoints()
        .ok_or(GatewayError::InvalidRoutePath(route_id))?;
    let mode: TransportMode = route.mode.parse()?;

    let metrics = TripMetrics::for_distance(trip_distance_m(&route, &path), mode);
    tracing::debug!(
        "trip on route {route_id}: {} m, {} g CO2, {} points",
        metrics.distance_m,
        metrics.co2_saved_g,
        metrics.points
    );

    let trip = TripHistory {
        id: None,
        route_id,
        mode,
        started_at: Utc::now(),
        finished_at: None,
        distance_m: metrics.distance_m,
        co2_saved_g: metrics.co2_saved_g,
        recorded_path: shared::Path::new(vec![start, end]).to_json_string()?,
    };
    let trip = state
        .backend
        .create_trip_history(&trip, Some(session))
        .await?;

    let points = award_points(&state.backend, session, metrics.points)
        .await
        .inspect_err(|err| {
            tracing::error!(
                "trip on route {route_id} was recorded but points were not credited: {err}"
            )
        })?;

    Ok(TripReceipt {
        trip,
        metrics,
        points,
    })
}

/// Adds `points` to the user's backend total and confirms the write by
/// reading it back. The backend offers no compare-and-swap, so the re-read
/// value is the only one trusted.
pub async fn award_points(
    backend: &BackendClient,
    session: &Session,
    points: u32,
) -> Result<PointsAward, GatewayError> {
    if points == 0 {
        return Ok(PointsAward {
            awarded: 0,
            total: None,
        });
    }

    let before = backend.get_user(session.user_id, Some(session)).await?;
    let expected = before.points_total() + u64::from(points);
    backend
        .update_points(session.user_id, expected, Some(session))
        .await?;

    let saved = backend
        .get_user(session.user_id, Some(session))
        .await?
        .points_total();
    if saved != expected {
        return Err(GatewayError::PointsNotPersisted { expected, saved });
    }

    tracing::info!(
        "user {} earned {points} points, total {saved}",
        session.user_id
    );
    Ok(PointsAward {
        awarded: points,
        total: Some(saved),
    })
}
