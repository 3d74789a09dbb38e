//! Vendor invoice endpoints, including image scanning

use axum::extract::State;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{ApprovalStatus, Invoice, InvoiceCreate, InvoiceDraft, InvoiceUpdate};

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::state::AppState;
use crate::{db, ocr};

#[derive(Debug, Deserialize)]
pub struct InvoiceQuery {
    pub store_id: Option<i64>,
    pub status: Option<ApprovalStatus>,
}

/// GET /api/invoices?store_id=&status=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<InvoiceQuery>,
) -> ApiResult<Vec<Invoice>> {
    let invoices = db::invoices::list(&state.pool, query.store_id, query.status).await?;
    Ok(ApiResponse::new("invoices", invoices))
}

/// POST /api/invoices
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<InvoiceCreate>,
) -> ApiResult<Invoice> {
    let invoice = db::invoices::create(&state.pool, req).await?;
    Ok(ApiResponse::new("invoice", invoice))
}

/// PUT /api/invoices/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<InvoiceUpdate>,
) -> ApiResult<Invoice> {
    let invoice = db::invoices::update(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice"))?;
    if invoice.status == ApprovalStatus::Approved {
        tracing::info!(invoice_id = invoice.id, total = invoice.total, "Invoice approved");
    }
    Ok(ApiResponse::new("invoice", invoice))
}

/// DELETE /api/invoices/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(db::invoices::delete(&state.pool, id).await?, "Invoice")
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub image_base64: String,
    #[serde(default = "default_media_type")]
    pub media_type: String,
}

fn default_media_type() -> String {
    "image/jpeg".to_string()
}

/// POST /api/invoices/scan
///
/// Returns a draft for review; nothing is stored.
pub async fn scan(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> ApiResult<InvoiceDraft> {
    let api_key = state
        .config
        .model
        .api_key
        .as_deref()
        .ok_or_else(|| AppError::not_configured("Invoice scanning"))?;
    ocr::validate_image(&req.image_base64, &req.media_type)?;

    let draft = ocr::scan_invoice(
        &state.http,
        &state.config.model,
        api_key,
        &req.image_base64,
        &req.media_type,
    )
    .await?;

    tracing::info!(
        vendor = draft.vendor.as_deref().unwrap_or(""),
        lines = draft.line_items.len(),
        "Invoice scanned"
    );
    Ok(ApiResponse::new("draft", draft))
}
