use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use stocky_core::portfolio::{HistoricalValue, PortfolioPosition, UserStats};
use stocky_core::rewards::TodayReward;

use crate::{api::parse_user_id, error::ApiResult, main_lib::AppState};

async fn today_stocks(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<TodayReward>>> {
    let user_id = parse_user_id(&user_id)?;
    Ok(Json(state.overview_service.today_rewards(&user_id)?))
}

async fn historical_inr(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<HistoricalValue>>> {
    let user_id = parse_user_id(&user_id)?;
    Ok(Json(state.overview_service.historical_inr(&user_id)?))
}

async fn stats(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<UserStats>> {
    let user_id = parse_user_id(&user_id)?;
    Ok(Json(state.overview_service.user_stats(&user_id).await?))
}

async fn portfolio(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PortfolioPosition>>> {
    let user_id = parse_user_id(&user_id)?;
    Ok(Json(state.overview_service.portfolio(&user_id).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/today-stocks/{user_id}", get(today_stocks))
        .route("/historical-inr/{user_id}", get(historical_inr))
        .route("/stats/{user_id}", get(stats))
        .route("/portfolio/{user_id}", get(portfolio))
}
