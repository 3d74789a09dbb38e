//! Aggregation endpoints: fetch rows, then fold

use axum::extract::State;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::util::{today, week_start};

use super::ApiResult;
use super::extract::Query;
use crate::analytics::employees::{EmployeeAnalytics, default_range};
use crate::analytics::labor_plan::{LaborPlan, history_range};
use crate::analytics::projection::{LivePnl, month_to_date};
use crate::analytics::sales_comparison::{ComparisonInputs, ComparisonRanges, SalesComparison};
use crate::analytics::{self, DateRange};
use crate::db;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StoreQuery {
    pub store_id: Option<i64>,
}

/// GET /api/analytics/sales-comparison?store_id=
pub async fn sales_comparison(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> ApiResult<SalesComparison> {
    let today = today();
    let ranges = ComparisonRanges::as_of(today);
    let pool = &state.pool;
    let store = query.store_id;

    let (this_week, last_week, same_week_last_year, ptd, prior_ptd, ytd, prior_ytd) =
        tokio::try_join!(
            db::analytics::sales_points(pool, ranges.this_week, store),
            db::analytics::sales_points(pool, ranges.last_week, store),
            db::analytics::sales_points(pool, ranges.same_week_last_year, store),
            db::analytics::sales_points(pool, ranges.period_to_date, store),
            db::analytics::sales_points(pool, ranges.prior_period_to_date, store),
            db::analytics::sales_points(pool, ranges.year_to_date, store),
            db::analytics::sales_points(pool, ranges.prior_year_to_date, store),
        )?;

    let inputs = ComparisonInputs {
        this_week,
        last_week,
        same_week_last_year,
        period_to_date: ptd,
        prior_period_to_date: prior_ptd,
        year_to_date: ytd,
        prior_year_to_date: prior_ytd,
    };
    let comparison = analytics::sales_comparison::compare(today, &ranges, &inputs);
    Ok(ApiResponse::new("comparison", comparison))
}

/// GET /api/analytics/live-pnl?store_id=
///
/// `projection` is null until the month has a KPI row.
pub async fn live_pnl(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> ApiResult<LivePnl> {
    let today = today();
    let range = month_to_date(today);
    let rows =
        db::kpis::list(&state.pool, query.store_id, Some(range.from), Some(range.to)).await?;
    Ok(ApiResponse::new("pnl", analytics::projection::project(today, &rows)))
}

#[derive(Debug, Deserialize)]
pub struct LaborPlanQuery {
    pub store_id: Option<i64>,
    /// Any day of the week to plan; defaults to the current week
    pub week: Option<NaiveDate>,
}

/// GET /api/analytics/labor-plan?store_id=&week=
pub async fn labor_plan(
    State(state): State<AppState>,
    Query(query): Query<LaborPlanQuery>,
) -> ApiResult<LaborPlan> {
    let today = today();
    let monday = week_start(query.week.unwrap_or(today));
    let history = history_range(today);

    let (shifts, sales) = tokio::try_join!(
        db::schedules::list_week(&state.pool, query.store_id, monday),
        db::analytics::sales_points(&state.pool, history, query.store_id),
    )?;

    let plan = analytics::labor_plan::plan(monday, today, &shifts, &sales);
    Ok(ApiResponse::new("plan", plan))
}

#[derive(Debug, Deserialize)]
pub struct EmployeeAnalyticsQuery {
    pub store_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub recruiting_spend: Option<f64>,
}

/// GET /api/analytics/employees?store_id=&from=&to=&recruiting_spend=
pub async fn employees(
    State(state): State<AppState>,
    Query(query): Query<EmployeeAnalyticsQuery>,
) -> ApiResult<EmployeeAnalytics> {
    let fallback = default_range(today());
    let range = DateRange::new(
        query.from.unwrap_or(fallback.from),
        query.to.unwrap_or(fallback.to),
    );
    if range.from > range.to {
        return Err(AppError::validation("from must not be after to").into());
    }
    if query.recruiting_spend.is_some_and(|s| s < 0.0) {
        return Err(AppError::validation("recruiting_spend must not be negative").into());
    }

    let roster = db::employees::list(&state.pool, query.store_id, None).await?;
    let result = analytics::employees::analyze(&roster, range, query.recruiting_spend);
    Ok(ApiResponse::new("employees", result))
}
