//! Invoice Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::approval::{ApprovalStatus, approval_timestamp};
use crate::error::{AppError, AppResult};
use crate::util::round2;

/// Invoice line (stored as JSONB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub product: String,
    pub qty: f64,
    pub unit_price: f64,
    /// Recomputed as `qty × unit_price`
    #[serde(default)]
    pub extended_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i64,
    pub store_id: i64,
    pub vendor: String,
    pub invoice_date: NaiveDate,
    pub invoice_number: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub line_items: Vec<InvoiceLine>,
    pub total: f64,
    pub status: ApprovalStatus,
    pub approved_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceCreate {
    pub store_id: i64,
    pub vendor: String,
    pub invoice_date: Option<NaiveDate>,
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub line_items: Vec<InvoiceLine>,
    /// Used only when no line items are given
    #[serde(default)]
    pub total: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    pub vendor: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub invoice_number: Option<String>,
    pub line_items: Option<Vec<InvoiceLine>>,
    pub total: Option<f64>,
    pub status: Option<ApprovalStatus>,
}

/// Extract of a scanned invoice, returned for review before saving.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub line_items: Vec<InvoiceLine>,
    #[serde(default)]
    pub total: Option<f64>,
}

impl Invoice {
    pub fn from_create(id: i64, data: InvoiceCreate, now: i64) -> AppResult<Self> {
        if data.vendor.trim().is_empty() {
            return Err(AppError::required("vendor"));
        }
        let invoice_date = data
            .invoice_date
            .ok_or_else(|| AppError::required("invoice_date"))?;
        let mut invoice = Self {
            id,
            store_id: data.store_id,
            vendor: data.vendor,
            invoice_date,
            invoice_number: data.invoice_number,
            line_items: data.line_items,
            total: data.total,
            status: ApprovalStatus::Pending,
            approved_at: None,
            created_at: now,
            updated_at: now,
        };
        invoice.recompute();
        Ok(invoice)
    }

    pub fn apply_update(&mut self, data: InvoiceUpdate, now: i64) -> AppResult<()> {
        if let Some(v) = data.vendor {
            self.vendor = v;
        }
        if let Some(v) = data.invoice_date {
            self.invoice_date = v;
        }
        if data.invoice_number.is_some() {
            self.invoice_number = data.invoice_number;
        }
        if let Some(v) = data.total {
            self.total = v;
        }
        if let Some(v) = data.line_items {
            self.line_items = v;
        }
        if self.vendor.trim().is_empty() {
            return Err(AppError::required("vendor"));
        }
        if let Some(status) = data.status {
            self.approved_at = approval_timestamp(self.status, status, self.approved_at, now);
            self.status = status;
        }
        self.recompute();
        self.updated_at = now;
        Ok(())
    }

    /// Extended prices, then the total when lines exist.
    fn recompute(&mut self) {
        for line in &mut self.line_items {
            line.extended_price = round2(line.qty * line.unit_price);
        }
        if !self.line_items.is_empty() {
            self.total = round2(self.line_items.iter().map(|l| l.extended_price).sum());
        } else {
            self.total = round2(self.total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product: &str, qty: f64, price: f64) -> InvoiceLine {
        InvoiceLine {
            product: product.into(),
            qty,
            unit_price: price,
            extended_price: 0.0,
        }
    }

    fn create(lines: Vec<InvoiceLine>, total: f64) -> InvoiceCreate {
        InvoiceCreate {
            store_id: 1,
            vendor: "Sysco".into(),
            invoice_date: NaiveDate::from_ymd_opt(2026, 3, 2),
            invoice_number: Some("INV-1001".into()),
            line_items: lines,
            total,
        }
    }

    #[test]
    fn test_total_from_lines() {
        let inv = Invoice::from_create(
            1,
            create(vec![line("Cheese", 4.0, 42.5), line("Boxes", 2.0, 31.25)], 999.0),
            0,
        )
        .unwrap();
        assert_eq!(inv.line_items[0].extended_price, 170.0);
        assert_eq!(inv.line_items[1].extended_price, 62.5);
        assert_eq!(inv.total, 232.5);
        assert_eq!(inv.status, ApprovalStatus::Pending);
    }

    #[test]
    fn test_total_kept_without_lines() {
        let inv = Invoice::from_create(1, create(vec![], 318.4), 0).unwrap();
        assert_eq!(inv.total, 318.4);
    }

    #[test]
    fn test_approval_sets_timestamp_once() {
        let mut inv = Invoice::from_create(1, create(vec![], 10.0), 0).unwrap();
        inv.apply_update(
            InvoiceUpdate {
                status: Some(ApprovalStatus::Approved),
                ..Default::default()
            },
            50,
        )
        .unwrap();
        assert_eq!(inv.approved_at, Some(50));
        inv.apply_update(
            InvoiceUpdate {
                vendor: Some("US Foods".into()),
                status: Some(ApprovalStatus::Approved),
                ..Default::default()
            },
            60,
        )
        .unwrap();
        assert_eq!(inv.approved_at, Some(50));
    }

    #[test]
    fn test_blank_vendor_update_rejected() {
        let mut inv = Invoice::from_create(1, create(vec![], 10.0), 0).unwrap();
        let result = inv.apply_update(
            InvoiceUpdate {
                vendor: Some(String::new()),
                ..Default::default()
            },
            5,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_date_rejected() {
        let mut data = create(vec![], 1.0);
        data.invoice_date = None;
        assert!(Invoice::from_create(1, data, 0).is_err());
    }

    #[test]
    fn test_draft_tolerates_missing_fields() {
        let draft: InvoiceDraft = serde_json::from_str(r#"{"vendor":"Sysco"}"#).unwrap();
        assert_eq!(draft.vendor.as_deref(), Some("Sysco"));
        assert!(draft.line_items.is_empty());
    }
}
