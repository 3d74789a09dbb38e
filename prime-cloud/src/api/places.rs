//! Place search and details (competitors, vendors)

use axum::extract::State;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};

use super::ApiResult;
use super::extract::{Path, Query};
use crate::places::{self, PlaceDetails, PlaceSummary};
use crate::state::AppState;

fn maps_key(state: &AppState) -> Result<&str, AppError> {
    state
        .config
        .maps_api_key
        .as_deref()
        .ok_or_else(|| AppError::not_configured("Places"))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// GET /api/places/search?query=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Vec<PlaceSummary>> {
    let api_key = maps_key(&state)?;
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::required("query"))?;

    let results = places::search(&state.http, api_key, query).await?;
    Ok(ApiResponse::new("places", results))
}

/// GET /api/places/{place_id}
pub async fn details(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> ApiResult<PlaceDetails> {
    let api_key = maps_key(&state)?;
    let place = places::details(&state.http, api_key, &place_id)
        .await?
        .ok_or_else(|| AppError::not_found("Place"))?;
    Ok(ApiResponse::new("place", place))
}
