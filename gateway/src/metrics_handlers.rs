// Stateless endpoints: nothing here touches the backend.

use axum::Json;
use shared::{normalize, TransportMode, TripMetrics};

use crate::error::GatewayError;
use crate::models::{NormalizeRequest, NormalizeResponse, TripMetricsRequest, TripMetricsResponse};

/// POST /api/paths/normalize - Canonical `[lat, lon]` form of any stored path
pub async fn normalize_path(Json(req): Json<NormalizeRequest>) -> Json<NormalizeResponse> {
    Json(NormalizeResponse {
        path: normalize(&req.path),
    })
}

/// POST /api/metrics/trip - Distance, CO2 savings and points for a path
pub async fn trip_metrics(
    Json(req): Json<TripMetricsRequest>,
) -> Result<Json<TripMetricsResponse>, GatewayError> {
    let mode: TransportMode = req.mode.parse()?;
    let path = normalize(&req.path);
    if path.is_empty() {
        return Err(GatewayError::EmptyPath);
    }

    let metrics = TripMetrics::for_path(&path, mode);
    tracing::debug!(
        "metrics for {} points by {mode}: {} m, {} points",
        path.len(),
        metrics.distance_m,
        metrics.points
    );
    Ok(Json(TripMetricsResponse { path, metrics }))
}
