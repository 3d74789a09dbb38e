//! Live P&L: month-to-date actuals extrapolated to month end

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use shared::models::DailyKpi;
use shared::util::{days_in_month, month_start, pct_of, round2};

use super::DateRange;

/// Fixed costs as a share of projected sales
pub const FIXED_COST_RATIO: f64 = 0.30;
/// What-if PRIME target, percent of sales
pub const PRIME_TARGET_PCT: f64 = 55.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostLines {
    pub sales: f64,
    pub labor: f64,
    pub food: f64,
    pub disposables: f64,
}

impl CostLines {
    fn prime(&self) -> f64 {
        self.labor + self.food + self.disposables
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            sales: f(self.sales),
            labor: f(self.labor),
            food: f(self.food),
            disposables: f(self.disposables),
        }
    }
}

/// Profit if PRIME landed exactly on target
#[derive(Debug, Clone, Serialize)]
pub struct PrimeScenario {
    pub target_pct: f64,
    pub target_prime: f64,
    pub profit_at_target: f64,
    /// Projected PRIME minus target PRIME; positive means over target
    pub gap: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Projection {
    pub days_in_month: u32,
    pub days_with_data: u32,
    pub days_remaining: u32,
    pub actual: CostLines,
    pub daily_avg: CostLines,
    pub projected: CostLines,
    pub prime_cost: f64,
    pub prime_pct: Option<f64>,
    pub fixed_costs: f64,
    pub projected_profit: f64,
    pub scenario: PrimeScenario,
}

#[derive(Debug, Clone, Serialize)]
pub struct LivePnl {
    pub month: DateRange,
    pub as_of: NaiveDate,
    /// `None` when the month has no KPI rows yet
    pub projection: Option<Projection>,
}

/// Month start through today
pub fn month_to_date(today: NaiveDate) -> DateRange {
    DateRange::new(month_start(today), today)
}

pub fn project(today: NaiveDate, rows: &[DailyKpi]) -> LivePnl {
    let range = month_to_date(today);
    let month_rows: Vec<&DailyKpi> = rows
        .iter()
        .filter(|r| range.contains(r.business_date))
        .collect();
    let dates: BTreeSet<NaiveDate> = month_rows.iter().map(|r| r.business_date).collect();
    let days_with_data = dates.len() as u32;

    let projection = (days_with_data > 0).then(|| {
        let actual = month_rows.iter().fold(CostLines::default(), |acc, r| CostLines {
            sales: acc.sales + r.net_sales,
            labor: acc.labor + r.labor_dollars,
            food: acc.food + r.food_dollars,
            disposables: acc.disposables + r.disposables_dollars,
        });
        let total_days = days_in_month(today);
        let days_remaining = total_days.saturating_sub(days_with_data);
        let daily_avg = actual.map(|v| v / days_with_data as f64);
        let projected = CostLines {
            sales: actual.sales + daily_avg.sales * days_remaining as f64,
            labor: actual.labor + daily_avg.labor * days_remaining as f64,
            food: actual.food + daily_avg.food * days_remaining as f64,
            disposables: actual.disposables + daily_avg.disposables * days_remaining as f64,
        };

        let prime_cost = projected.prime();
        let fixed_costs = projected.sales * FIXED_COST_RATIO;
        let target_prime = projected.sales * PRIME_TARGET_PCT / 100.0;

        Projection {
            days_in_month: total_days,
            days_with_data,
            days_remaining,
            actual: actual.map(round2),
            daily_avg: daily_avg.map(round2),
            projected: projected.map(round2),
            prime_cost: round2(prime_cost),
            prime_pct: pct_of(prime_cost, projected.sales),
            fixed_costs: round2(fixed_costs),
            projected_profit: round2(projected.sales - prime_cost - fixed_costs),
            scenario: PrimeScenario {
                target_pct: PRIME_TARGET_PCT,
                target_prime: round2(target_prime),
                profit_at_target: round2(projected.sales - target_prime - fixed_costs),
                gap: round2(prime_cost - target_prime),
            },
        }
    });

    let month_end = range.from + Duration::days(days_in_month(today) as i64 - 1);
    LivePnl {
        month: DateRange::new(range.from, month_end),
        as_of: today,
        projection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::date;

    fn kpi(day: &str, sales: f64, labor: f64, food: f64) -> DailyKpi {
        DailyKpi {
            id: 1,
            store_id: 1,
            business_date: date(day),
            net_sales: sales,
            labor_dollars: labor,
            labor_hours: 0.0,
            food_dollars: food,
            disposables_dollars: 0.0,
            voids_dollars: 0.0,
            waste_dollars: 0.0,
            customer_count: 0,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_february_projection() {
        let rows: Vec<DailyKpi> = (1..=5)
            .map(|d| kpi(&format!("2026-02-0{d}"), 1000.0, 250.0, 300.0))
            .collect();
        let pnl = project(date("2026-02-05"), &rows);
        let p = pnl.projection.unwrap();
        assert_eq!(p.days_in_month, 28);
        assert_eq!(p.days_with_data, 5);
        assert_eq!(p.days_remaining, 23);
        assert_eq!(p.daily_avg.sales, 1000.0);
        assert_eq!(p.projected.sales, 28000.0);
        assert_eq!(p.projected.labor, 7000.0);
        assert_eq!(p.prime_cost, 15400.0);
        assert_eq!(p.prime_pct, Some(55.0));
        assert_eq!(p.fixed_costs, 8400.0);
        assert_eq!(p.projected_profit, 4200.0);
        assert_eq!(p.scenario.target_prime, 15400.0);
        assert_eq!(p.scenario.gap, 0.0);
        assert_eq!(pnl.month.to, date("2026-02-28"));
    }

    #[test]
    fn test_empty_month_has_null_projection() {
        // Last month's rows do not count
        let rows = vec![kpi("2026-01-31", 900.0, 200.0, 250.0)];
        let pnl = project(date("2026-02-05"), &rows);
        assert!(pnl.projection.is_none());
        let json = serde_json::to_value(&pnl).unwrap();
        assert!(json["projection"].is_null());
    }

    #[test]
    fn test_zero_sales_gives_null_prime_pct() {
        let pnl = project(date("2026-02-02"), &[kpi("2026-02-01", 0.0, 100.0, 0.0)]);
        assert_eq!(pnl.projection.unwrap().prime_pct, None);
    }

    #[test]
    fn test_same_rows_same_json() {
        let rows = vec![kpi("2026-02-01", 1234.56, 300.1, 401.7)];
        let a = serde_json::to_string(&project(date("2026-02-03"), &rows)).unwrap();
        let b = serde_json::to_string(&project(date("2026-02-03"), &rows)).unwrap();
        assert_eq!(a, b);
    }
}
