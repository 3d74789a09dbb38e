//! Marketing campaign endpoints

use axum::extract::State;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{CampaignCreate, CampaignUpdate, MarketingCampaign};

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::db;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CampaignQuery {
    pub store_id: Option<i64>,
}

/// GET /api/campaigns?store_id=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CampaignQuery>,
) -> ApiResult<Vec<MarketingCampaign>> {
    let campaigns = db::marketing::list(&state.pool, query.store_id).await?;
    Ok(ApiResponse::new("campaigns", campaigns))
}

/// POST /api/campaigns
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CampaignCreate>,
) -> ApiResult<MarketingCampaign> {
    let campaign = db::marketing::create(&state.pool, req).await?;
    Ok(ApiResponse::new("campaign", campaign))
}

/// PUT /api/campaigns/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CampaignUpdate>,
) -> ApiResult<MarketingCampaign> {
    let campaign = db::marketing::update(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Campaign"))?;
    Ok(ApiResponse::new("campaign", campaign))
}

/// DELETE /api/campaigns/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(db::marketing::delete(&state.pool, id).await?, "Campaign")
}
