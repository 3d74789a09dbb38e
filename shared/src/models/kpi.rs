//! Daily KPI Model
//!
//! One row per store per business date. Entering a date that already exists
//! replaces the stored figures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DailyKpi {
    pub id: i64,
    pub store_id: i64,
    pub business_date: NaiveDate,
    pub net_sales: f64,
    pub labor_dollars: f64,
    pub labor_hours: f64,
    pub food_dollars: f64,
    pub disposables_dollars: f64,
    pub voids_dollars: f64,
    pub waste_dollars: f64,
    pub customer_count: i32,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Upsert payload for a business date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyKpiInput {
    pub store_id: i64,
    pub business_date: Option<NaiveDate>,
    #[serde(default)]
    pub net_sales: f64,
    #[serde(default)]
    pub labor_dollars: f64,
    #[serde(default)]
    pub labor_hours: f64,
    #[serde(default)]
    pub food_dollars: f64,
    #[serde(default)]
    pub disposables_dollars: f64,
    #[serde(default)]
    pub voids_dollars: f64,
    #[serde(default)]
    pub waste_dollars: f64,
    #[serde(default)]
    pub customer_count: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyKpiUpdate {
    pub net_sales: Option<f64>,
    pub labor_dollars: Option<f64>,
    pub labor_hours: Option<f64>,
    pub food_dollars: Option<f64>,
    pub disposables_dollars: Option<f64>,
    pub voids_dollars: Option<f64>,
    pub waste_dollars: Option<f64>,
    pub customer_count: Option<i32>,
    pub notes: Option<String>,
}

impl DailyKpi {
    pub fn apply_update(&mut self, data: DailyKpiUpdate) {
        if let Some(v) = data.net_sales {
            self.net_sales = v;
        }
        if let Some(v) = data.labor_dollars {
            self.labor_dollars = v;
        }
        if let Some(v) = data.labor_hours {
            self.labor_hours = v;
        }
        if let Some(v) = data.food_dollars {
            self.food_dollars = v;
        }
        if let Some(v) = data.disposables_dollars {
            self.disposables_dollars = v;
        }
        if let Some(v) = data.voids_dollars {
            self.voids_dollars = v;
        }
        if let Some(v) = data.waste_dollars {
            self.waste_dollars = v;
        }
        if let Some(v) = data.customer_count {
            self.customer_count = v;
        }
        if data.notes.is_some() {
            self.notes = data.notes;
        }
    }
}
