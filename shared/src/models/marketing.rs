//! Marketing Campaign Model (CAC / LTV / ROI)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::util::round2;

/// Derived campaign economics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CampaignMetrics {
    pub customer_cac: f64,
    pub customer_ltv: f64,
    pub roi_multiple: f64,
    pub revenue_attributed: f64,
}

impl CampaignMetrics {
    pub fn compute(spend: f64, new_customers: i32, avg_ticket: f64, repeat_visits: f64) -> Self {
        let customers = new_customers as f64;
        let cac = if new_customers > 0 {
            round2(spend / customers)
        } else {
            0.0
        };
        let ltv = round2(avg_ticket * repeat_visits);
        let roi = if cac > 0.0 { round2(ltv / cac) } else { 0.0 };
        Self {
            customer_cac: cac,
            customer_ltv: ltv,
            roi_multiple: roi,
            revenue_attributed: round2(customers * ltv),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MarketingCampaign {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    /// e.g. `"mailer"`, `"social"`, `"radio"`
    pub channel: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub spend: f64,
    pub new_customers: i32,
    pub avg_ticket: f64,
    pub repeat_visits: f64,
    pub customer_cac: f64,
    pub customer_ltv: f64,
    pub roi_multiple: f64,
    pub revenue_attributed: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignCreate {
    pub store_id: i64,
    pub name: String,
    #[serde(default)]
    pub channel: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub new_customers: i32,
    #[serde(default)]
    pub avg_ticket: f64,
    #[serde(default)]
    pub repeat_visits: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignUpdate {
    pub name: Option<String>,
    pub channel: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub spend: Option<f64>,
    pub new_customers: Option<i32>,
    pub avg_ticket: Option<f64>,
    pub repeat_visits: Option<f64>,
}

impl MarketingCampaign {
    pub fn from_create(id: i64, data: CampaignCreate, now: i64) -> AppResult<Self> {
        let mut campaign = Self {
            id,
            store_id: data.store_id,
            name: data.name,
            channel: data.channel,
            start_date: data.start_date,
            end_date: data.end_date,
            spend: data.spend,
            new_customers: data.new_customers,
            avg_ticket: data.avg_ticket,
            repeat_visits: data.repeat_visits,
            customer_cac: 0.0,
            customer_ltv: 0.0,
            roi_multiple: 0.0,
            revenue_attributed: 0.0,
            created_at: now,
            updated_at: now,
        };
        campaign.validate()?;
        campaign.recompute();
        Ok(campaign)
    }

    pub fn apply_update(&mut self, data: CampaignUpdate, now: i64) -> AppResult<()> {
        if let Some(v) = data.name {
            self.name = v;
        }
        if let Some(v) = data.channel {
            self.channel = v;
        }
        if data.start_date.is_some() {
            self.start_date = data.start_date;
        }
        if data.end_date.is_some() {
            self.end_date = data.end_date;
        }
        if let Some(v) = data.spend {
            self.spend = v;
        }
        if let Some(v) = data.new_customers {
            self.new_customers = v;
        }
        if let Some(v) = data.avg_ticket {
            self.avg_ticket = v;
        }
        if let Some(v) = data.repeat_visits {
            self.repeat_visits = v;
        }
        self.validate()?;
        self.recompute();
        self.updated_at = now;
        Ok(())
    }

    fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::required("name"));
        }
        if self.new_customers < 0 || self.spend < 0.0 {
            return Err(AppError::validation(
                "spend and new_customers must not be negative",
            ));
        }
        Ok(())
    }

    fn recompute(&mut self) {
        let m = CampaignMetrics::compute(
            self.spend,
            self.new_customers,
            self.avg_ticket,
            self.repeat_visits,
        );
        self.customer_cac = m.customer_cac;
        self.customer_ltv = m.customer_ltv;
        self.roi_multiple = m.roi_multiple;
        self.revenue_attributed = m.revenue_attributed;
    }
}
