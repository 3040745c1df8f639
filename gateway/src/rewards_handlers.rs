use axum::{
    extract::{Path, State},
    Json,
};
use shared::TierProgress;

use crate::error::GatewayError;
use crate::models::{RewardsSummary, TierProgressView};
use crate::session::Session;
use crate::AppState;

/// GET /api/rewards/tiers/:points - Tier and progress for any point total
pub async fn tier_progress(Path(points): Path<i64>) -> Json<TierProgressView> {
    Json(TierProgress::evaluate(points).into())
}

/// GET /api/rewards/me - The signed-in user's tier, from the backend's total
pub async fn my_rewards(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<RewardsSummary>, GatewayError> {
    let user = state.backend.get_user(session.user_id, Some(&session)).await?;
    let total = i64::try_from(user.points_total()).unwrap_or(i64::MAX);

    Ok(Json(RewardsSummary {
        user_id: user.id,
        name: user.display_name().to_string(),
        rewards: TierProgress::evaluate(total).into(),
    }))
}
