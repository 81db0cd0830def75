use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use stocky_core::rewards::{NewReward, RewardDetail, RewardEvent};

use crate::{api::parse_user_id, error::ApiResult, main_lib::AppState};

async fn create_reward(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewReward>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RewardEvent>)> {
    let Json(mut new_reward) = payload?;
    new_reward.user_id = parse_user_id(&new_reward.user_id)?;
    let event = state.reward_service.create_reward(new_reward).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn get_reward(
    Path(event_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RewardDetail>> {
    let detail = state.reward_service.get_reward(&event_id)?;
    Ok(Json(detail))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reward", post(create_reward))
        .route("/rewards/{event_id}", get(get_reward))
}
