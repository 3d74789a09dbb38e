//! Party and merchandise orders
//!
//! Both carry `items` whose totals are recomputed whenever items change.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::approval::{ApprovalStatus, approval_timestamp};
use super::optional_clock;
use crate::error::{AppError, AppResult};
use crate::util::round2;

/// Sales tax applied to party and merch orders
pub const TAX_RATE: f64 = 0.075;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub qty: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl OrderTotals {
    pub fn compute(items: &[OrderItem]) -> Self {
        let subtotal = round2(items.iter().map(|i| i.qty * i.price).sum());
        let tax = round2(subtotal * TAX_RATE);
        Self {
            subtotal,
            tax,
            total: round2(subtotal + tax),
        }
    }
}

fn validate_items(items: &[OrderItem]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::required("items"));
    }
    if items.iter().any(|i| i.qty <= 0.0 || i.price < 0.0) {
        return Err(AppError::validation(
            "Item qty must be positive and price non-negative",
        ));
    }
    Ok(())
}

// ── Party orders ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PartyOrder {
    pub id: i64,
    pub store_id: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: Option<String>,
    pub guest_count: i32,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: ApprovalStatus,
    pub approved_at: Option<i64>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyOrderCreate {
    pub store_id: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    #[serde(default)]
    pub guest_count: i32,
    pub items: Vec<OrderItem>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyOrderUpdate {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub guest_count: Option<i32>,
    pub items: Option<Vec<OrderItem>>,
    pub status: Option<ApprovalStatus>,
    pub notes: Option<String>,
}

impl PartyOrder {
    pub fn from_create(id: i64, data: PartyOrderCreate, now: i64) -> AppResult<Self> {
        if data.customer_name.trim().is_empty() {
            return Err(AppError::required("customer_name"));
        }
        let event_date = data.event_date.ok_or_else(|| AppError::required("event_date"))?;
        let event_time = optional_clock("event_time", data.event_time)?;
        validate_items(&data.items)?;
        let totals = OrderTotals::compute(&data.items);
        Ok(Self {
            id,
            store_id: data.store_id,
            customer_name: data.customer_name,
            customer_phone: data.customer_phone,
            customer_email: data.customer_email,
            event_date,
            event_time,
            guest_count: data.guest_count,
            items: data.items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            status: ApprovalStatus::Pending,
            approved_at: None,
            notes: data.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, data: PartyOrderUpdate, now: i64) -> AppResult<()> {
        if let Some(v) = data.customer_name {
            self.customer_name = v;
        }
        if data.customer_phone.is_some() {
            self.customer_phone = data.customer_phone;
        }
        if data.customer_email.is_some() {
            self.customer_email = data.customer_email;
        }
        if let Some(v) = data.event_date {
            self.event_date = v;
        }
        if data.event_time.is_some() {
            self.event_time = optional_clock("event_time", data.event_time)?;
        }
        if let Some(v) = data.guest_count {
            self.guest_count = v;
        }
        if let Some(items) = data.items {
            validate_items(&items)?;
            let totals = OrderTotals::compute(&items);
            self.items = items;
            self.subtotal = totals.subtotal;
            self.tax = totals.tax;
            self.total = totals.total;
        }
        if let Some(status) = data.status {
            self.approved_at = approval_timestamp(self.status, status, self.approved_at, now);
            self.status = status;
        }
        if data.notes.is_some() {
            self.notes = data.notes;
        }
        self.updated_at = now;
        Ok(())
    }
}

// ── Merchandise orders ──

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "merch_order_status", rename_all = "lowercase")
)]
pub enum MerchOrderStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MerchOrder {
    pub id: i64,
    pub store_id: Option<i64>,
    pub customer_name: String,
    pub customer_email: String,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: MerchOrderStatus,
    /// Billing provider checkout session, known before the row is written
    pub checkout_session_id: Option<String>,
    pub paid_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchOrderCreate {
    pub store_id: Option<i64>,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderItem>,
    /// Create a hosted checkout session for this order
    #[serde(default)]
    pub checkout: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MerchOrderUpdate {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub items: Option<Vec<OrderItem>>,
    pub status: Option<MerchOrderStatus>,
}

impl MerchOrder {
    pub fn from_create(
        id: i64,
        data: MerchOrderCreate,
        checkout_session_id: Option<String>,
        now: i64,
    ) -> AppResult<Self> {
        validate_items(&data.items)?;
        let totals = OrderTotals::compute(&data.items);
        let order = Self {
            id,
            store_id: data.store_id,
            customer_name: data.customer_name,
            customer_email: data.customer_email,
            items: data.items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            status: MerchOrderStatus::Pending,
            checkout_session_id,
            paid_at: None,
            created_at: now,
            updated_at: now,
        };
        order.validate_customer()?;
        Ok(order)
    }

    fn validate_customer(&self) -> AppResult<()> {
        if self.customer_name.trim().is_empty() {
            return Err(AppError::required("customer_name"));
        }
        if !self.customer_email.contains('@') {
            return Err(AppError::validation("customer_email is invalid"));
        }
        Ok(())
    }

    pub fn apply_update(&mut self, data: MerchOrderUpdate, now: i64) -> AppResult<()> {
        if let Some(v) = data.customer_name {
            self.customer_name = v;
        }
        if let Some(v) = data.customer_email {
            self.customer_email = v;
        }
        self.validate_customer()?;
        if let Some(items) = data.items {
            validate_items(&items)?;
            let totals = OrderTotals::compute(&items);
            self.items = items;
            self.subtotal = totals.subtotal;
            self.tax = totals.tax;
            self.total = totals.total;
        }
        if let Some(status) = data.status {
            self.mark_status(status, now);
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn mark_status(&mut self, status: MerchOrderStatus, now: i64) {
        self.paid_at = match status {
            MerchOrderStatus::Paid => self.paid_at.or(Some(now)),
            _ => None,
        };
        self.status = status;
        self.updated_at = now;
    }

    /// Record a completed checkout. Returns `true` only on the transition
    /// into `Paid`, so callers notify the customer exactly once.
    pub fn mark_paid(&mut self, checkout_session_id: &str, now: i64) -> bool {
        let transitioned = self.status != MerchOrderStatus::Paid;
        if transitioned {
            self.mark_status(MerchOrderStatus::Paid, now);
        }
        if self.checkout_session_id.is_none() {
            self.checkout_session_id = Some(checkout_session_id.to_string());
            self.updated_at = now;
        }
        transitioned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, qty: f64, price: f64) -> OrderItem {
        OrderItem {
            name: name.into(),
            qty,
            price,
        }
    }

    #[test]
    fn test_totals_with_tax() {
        let t = OrderTotals::compute(&[item("Large cheese", 10.0, 12.0), item("Wings", 4.0, 9.5)]);
        assert_eq!(t.subtotal, 158.0);
        assert_eq!(t.tax, 11.85);
        assert_eq!(t.total, 169.85);
    }

    #[test]
    fn test_party_items_change_recomputes() {
        let mut p = PartyOrder::from_create(
            1,
            PartyOrderCreate {
                store_id: 1,
                customer_name: "Lincoln Elementary".into(),
                customer_phone: None,
                customer_email: None,
                event_date: NaiveDate::from_ymd_opt(2026, 5, 1),
                event_time: Some("11:30".into()),
                guest_count: 40,
                items: vec![item("Large cheese", 10.0, 12.0)],
                notes: None,
            },
            0,
        )
        .unwrap();
        assert_eq!(p.total, 129.0);

        p.apply_update(
            PartyOrderUpdate {
                items: Some(vec![item("Large cheese", 20.0, 12.0)]),
                status: Some(ApprovalStatus::Approved),
                ..Default::default()
            },
            9,
        )
        .unwrap();
        assert_eq!(p.subtotal, 240.0);
        assert_eq!(p.tax, 18.0);
        assert_eq!(p.total, 258.0);
        assert_eq!(p.approved_at, Some(9));
    }

    #[test]
    fn test_party_event_time_zero_padded() {
        let mut p = PartyOrder::from_create(
            2,
            PartyOrderCreate {
                store_id: 1,
                customer_name: "Troop 41".into(),
                customer_phone: None,
                customer_email: None,
                event_date: NaiveDate::from_ymd_opt(2026, 6, 12),
                event_time: Some("9:30".into()),
                guest_count: 12,
                items: vec![item("Large pepperoni", 3.0, 14.0)],
                notes: None,
            },
            0,
        )
        .unwrap();
        assert_eq!(p.event_time.as_deref(), Some("09:30"));

        let result = p.apply_update(
            PartyOrderUpdate {
                event_time: Some("25:00".into()),
                ..Default::default()
            },
            1,
        );
        assert!(result.is_err());
        assert_eq!(p.event_time.as_deref(), Some("09:30"));
    }

    #[test]
    fn test_empty_items_rejected() {
        let result = MerchOrder::from_create(
            1,
            MerchOrderCreate {
                store_id: None,
                customer_name: "Ana".into(),
                customer_email: "ana@example.com".into(),
                items: vec![],
                checkout: false,
            },
            None,
            0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_merch_paid_timestamp() {
        let mut m = MerchOrder::from_create(
            1,
            MerchOrderCreate {
                store_id: Some(1),
                customer_name: "Ana".into(),
                customer_email: "ana@example.com".into(),
                items: vec![item("T-shirt", 2.0, 20.0)],
                checkout: true,
            },
            Some("cs_test_123".into()),
            0,
        )
        .unwrap();
        assert_eq!(m.total, 43.0);
        assert_eq!(m.checkout_session_id.as_deref(), Some("cs_test_123"));
        m.mark_status(MerchOrderStatus::Paid, 5);
        m.mark_status(MerchOrderStatus::Paid, 6);
        assert_eq!(m.paid_at, Some(5));
        m.mark_status(MerchOrderStatus::Cancelled, 7);
        assert_eq!(m.paid_at, None);
    }

    #[test]
    fn test_merch_update_rejects_bad_email() {
        let mut m = MerchOrder::from_create(
            1,
            MerchOrderCreate {
                store_id: None,
                customer_name: "Ana".into(),
                customer_email: "ana@example.com".into(),
                items: vec![item("Hat", 1.0, 15.0)],
                checkout: false,
            },
            None,
            0,
        )
        .unwrap();
        let result = m.apply_update(
            MerchOrderUpdate {
                customer_email: Some("not-an-address".into()),
                ..Default::default()
            },
            1,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_mark_paid_transitions_once() {
        let mut order = MerchOrder::from_create(
            5,
            MerchOrderCreate {
                store_id: None,
                customer_name: "Ana".into(),
                customer_email: "ana@example.com".into(),
                items: vec![item("Logo hoodie", 1.0, 40.0)],
                checkout: true,
            },
            None,
            0,
        )
        .unwrap();
        assert!(order.mark_paid("cs_test_1", 10));
        assert_eq!(order.status, MerchOrderStatus::Paid);
        assert_eq!(order.paid_at, Some(10));
        assert_eq!(order.checkout_session_id.as_deref(), Some("cs_test_1"));

        // Webhook and session reconcile both land: only the first one counts
        assert!(!order.mark_paid("cs_test_2", 20));
        assert_eq!(order.paid_at, Some(10));
        assert_eq!(order.checkout_session_id.as_deref(), Some("cs_test_1"));
    }
}
