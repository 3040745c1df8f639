use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::UnknownTransportMode;
use thiserror::Error;

use crate::api_client::ApiClientError;
use crate::guard::Submission;
use crate::road_router::RoadRouterError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("backend request failed: {0}")]
    Backend(#[from] ApiClientError),
    #[error("road routing failed: {0}")]
    RoadRouter(#[from] RoadRouterError),
    #[error(transparent)]
    UnknownMode(#[from] UnknownTransportMode),
    #[error("path has no usable coordinates")]
    EmptyPath,
    #[error("route {0} has no valid coordinates")]
    InvalidRoutePath(u64),
    #[error("no road route between the selected points")]
    NoRoadRoute,
    #[error("{0}")]
    Validation(String),
    #[error("missing or invalid session")]
    Unauthorized,
    #[error("a {} request is already in progress for this user", .0.as_str())]
    SubmissionInFlight(Submission),
    #[error("backend accepted the update but stored {saved} points instead of {expected}")]
    PointsNotPersisted { expected: u64, saved: u64 },
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Backend(ApiClientError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Backend(ApiClientError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            Self::Backend(_) | Self::PointsNotPersisted { .. } => StatusCode::BAD_GATEWAY,
            Self::RoadRouter(_) => StatusCode::BAD_GATEWAY,
            Self::UnknownMode(_)
            | Self::EmptyPath
            | Self::InvalidRoutePath(_)
            | Self::NoRoadRoute
            | Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::SubmissionInFlight(_) => StatusCode::CONFLICT,
            Self::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::debug!("request rejected ({status}): {self}");
        }

        (
            status,
            Json(ApiError {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_statuses() {
        assert_eq!(
            GatewayError::Backend(ApiClientError::NotFound {
                resource: "routes",
                id: 4
            })
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::UnknownMode(UnknownTransportMode("auto".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            GatewayError::SubmissionInFlight(Submission::StartTrip).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            GatewayError::PointsNotPersisted {
                expected: 20,
                saved: 15
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(GatewayError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn unknown_mode_message_names_the_mode() {
        let err = GatewayError::from(UnknownTransportMode("auto".into()));
        assert_eq!(err.to_string(), "unknown transport mode \"auto\"");
    }
}
