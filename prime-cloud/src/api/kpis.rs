//! Daily KPI endpoints

use axum::extract::State;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{DailyKpi, DailyKpiInput, DailyKpiUpdate};

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::db;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct KpiQuery {
    pub store_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// GET /api/kpis?store_id=&from=&to=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<KpiQuery>,
) -> ApiResult<Vec<DailyKpi>> {
    let rows = db::kpis::list(&state.pool, query.store_id, query.from, query.to).await?;
    Ok(ApiResponse::new("kpis", rows))
}

/// POST /api/kpis (one row per store and business date; repeats overwrite)
pub async fn upsert(
    State(state): State<AppState>,
    Json(req): Json<DailyKpiInput>,
) -> ApiResult<DailyKpi> {
    let kpi = db::kpis::upsert(&state.pool, req).await?;
    tracing::info!(store_id = kpi.store_id, date = %kpi.business_date, "KPI saved");
    Ok(ApiResponse::new("kpi", kpi))
}

/// PUT /api/kpis/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<DailyKpiUpdate>,
) -> ApiResult<DailyKpi> {
    let kpi = db::kpis::update(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("KPI"))?;
    Ok(ApiResponse::new("kpi", kpi))
}

/// DELETE /api/kpis/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(db::kpis::delete(&state.pool, id).await?, "KPI")
}
