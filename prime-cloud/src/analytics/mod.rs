//! Aggregation folds
//!
//! Each submodule is a pure function of fetched rows plus "today". Handlers
//! fetch, then fold; nothing here touches the pool or the clock, so the same
//! inputs always serialize to the same JSON.

pub mod employees;
pub mod labor_plan;
pub mod projection;
pub mod sales_comparison;

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Inclusive calendar range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Seven days starting at `start`
    pub fn week(start: NaiveDate) -> Self {
        Self::new(start, start + Duration::days(6))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    pub fn shift_days(&self, days: i64) -> Self {
        Self::new(self.from + Duration::days(days), self.to + Duration::days(days))
    }
}

/// One day's net sales for one store
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SalesPoint {
    pub business_date: NaiveDate,
    pub net_sales: f64,
}

/// 0 = Monday
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// Sum of sales per weekday bucket
pub fn bucket_by_weekday(points: &[SalesPoint]) -> [f64; 7] {
    let mut buckets = [0.0; 7];
    for p in points {
        buckets[weekday_index(p.business_date)] += p.net_sales;
    }
    buckets
}

/// Rows from several stores on one date collapse into one daily total.
pub fn sales_by_date(points: &[SalesPoint]) -> BTreeMap<NaiveDate, f64> {
    let mut days = BTreeMap::new();
    for p in points {
        *days.entry(p.business_date).or_insert(0.0) += p.net_sales;
    }
    days
}

#[cfg(test)]
pub(crate) fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[cfg(test)]
pub(crate) fn point(s: &str, net_sales: f64) -> SalesPoint {
    SalesPoint {
        business_date: date(s),
        net_sales,
    }
}
