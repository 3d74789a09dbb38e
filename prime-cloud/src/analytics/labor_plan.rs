//! Weekly labor plan against a 21% labor target

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use shared::models::Shift;
use shared::util::{pct_of, round2};

use super::{DateRange, SalesPoint, WEEKDAYS, sales_by_date, weekday_index};

pub const LABOR_TARGET_PCT: f64 = 21.0;
/// Days of sales history behind the weekday averages
pub const HISTORY_DAYS: i64 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaborStatus {
    Over,
    Under,
    OnTarget,
}

#[derive(Debug, Clone, Serialize)]
pub struct LaborDay {
    pub date: NaiveDate,
    pub day: &'static str,
    pub projected_sales: f64,
    pub scheduled_hours: f64,
    pub labor_cost: f64,
    pub labor_pct: Option<f64>,
    /// Sales per labor hour
    pub splh: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LaborTotals {
    pub projected_sales: f64,
    pub scheduled_hours: f64,
    pub labor_cost: f64,
    pub labor_pct: Option<f64>,
    pub splh: Option<f64>,
    pub target_pct: f64,
    pub target_labor: f64,
    /// Positive means over target
    pub variance: f64,
    pub status: LaborStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct LaborPlan {
    pub week: DateRange,
    pub history: DateRange,
    pub days: Vec<LaborDay>,
    pub totals: LaborTotals,
}

/// The 28 days before `today`, excluding today
pub fn history_range(today: NaiveDate) -> DateRange {
    DateRange::new(today - Duration::days(HISTORY_DAYS), today - Duration::days(1))
}

/// Average daily sales per weekday over the days that have data
pub fn weekday_averages(history: &[SalesPoint]) -> [f64; 7] {
    let mut sums = [0.0; 7];
    let mut counts = [0u32; 7];
    for (date, sales) in sales_by_date(history) {
        let i = weekday_index(date);
        sums[i] += sales;
        counts[i] += 1;
    }
    let mut avgs = [0.0; 7];
    for i in 0..7 {
        if counts[i] > 0 {
            avgs[i] = sums[i] / counts[i] as f64;
        }
    }
    avgs
}

fn splh(sales: f64, hours: f64) -> Option<f64> {
    (hours > 0.0).then(|| round2(sales / hours))
}

pub fn plan(
    week_start: NaiveDate,
    today: NaiveDate,
    shifts: &[Shift],
    history: &[SalesPoint],
) -> LaborPlan {
    let week = DateRange::week(week_start);
    let averages = weekday_averages(history);

    let days: Vec<LaborDay> = (0..7)
        .map(|offset| {
            let date = week_start + Duration::days(offset);
            let (hours, cost) = shifts
                .iter()
                .filter(|s| s.shift_date == date)
                .fold((0.0, 0.0), |(h, c), s| (h + s.hours, c + s.labor_cost));
            let projected = round2(averages[weekday_index(date)]);
            LaborDay {
                date,
                day: WEEKDAYS[weekday_index(date)],
                projected_sales: projected,
                scheduled_hours: round2(hours),
                labor_cost: round2(cost),
                labor_pct: pct_of(cost, projected),
                splh: splh(projected, hours),
            }
        })
        .collect();

    let projected_sales = round2(days.iter().map(|d| d.projected_sales).sum());
    let scheduled_hours = round2(days.iter().map(|d| d.scheduled_hours).sum());
    let labor_cost = round2(days.iter().map(|d| d.labor_cost).sum());
    let target_labor = round2(projected_sales * LABOR_TARGET_PCT / 100.0);
    let variance = round2(labor_cost - target_labor);
    let status = if variance > 0.0 {
        LaborStatus::Over
    } else if variance < 0.0 {
        LaborStatus::Under
    } else {
        LaborStatus::OnTarget
    };

    LaborPlan {
        week,
        history: history_range(today),
        days,
        totals: LaborTotals {
            projected_sales,
            scheduled_hours,
            labor_cost,
            labor_pct: pct_of(labor_cost, projected_sales),
            splh: splh(projected_sales, scheduled_hours),
            target_pct: LABOR_TARGET_PCT,
            target_labor,
            variance,
            status,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{date, point};
    use shared::models::ShiftCreate;

    fn shift(day: &str, role: &str, start: &str, end: &str) -> Shift {
        Shift::from_create(
            1,
            ShiftCreate {
                store_id: 1,
                employee_name: "Sam".into(),
                role: role.into(),
                shift_date: Some(date(day)),
                start_time: start.into(),
                end_time: end.into(),
                notes: None,
            },
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_history_range_excludes_today() {
        let range = history_range(date("2026-03-30"));
        assert_eq!(range.from, date("2026-03-02"));
        assert_eq!(range.to, date("2026-03-29"));
    }

    #[test]
    fn test_weekday_averages_over_days_with_data() {
        // Two Mondays with data, the other two Mondays missing
        let avgs = weekday_averages(&[
            point("2026-03-02", 1000.0),
            point("2026-03-09", 1400.0),
            point("2026-03-10", 900.0),
        ]);
        assert_eq!(avgs[0], 1200.0);
        assert_eq!(avgs[1], 900.0);
        assert_eq!(avgs[2], 0.0);
    }

    #[test]
    fn test_plan_totals_and_status() {
        let history = vec![point("2026-03-02", 1000.0), point("2026-03-03", 1000.0)];
        let shifts = vec![
            shift("2026-03-30", "cook", "09:00", "17:00"),
            shift("2026-03-30", "manager", "10:00", "14:00"),
            shift("2026-03-31", "cook", "09:00", "13:00"),
        ];
        let result = plan(date("2026-03-30"), date("2026-03-30"), &shifts, &history);

        let monday = &result.days[0];
        assert_eq!(monday.day, "Mon");
        assert_eq!(monday.scheduled_hours, 12.0);
        assert_eq!(monday.labor_cost, 192.0);
        assert_eq!(monday.labor_pct, Some(19.2));
        assert_eq!(monday.splh, Some(83.33));

        let wednesday = &result.days[2];
        assert_eq!(wednesday.labor_pct, None);
        assert_eq!(wednesday.splh, None);

        assert_eq!(result.totals.projected_sales, 2000.0);
        assert_eq!(result.totals.labor_cost, 248.0);
        assert_eq!(result.totals.target_labor, 420.0);
        assert_eq!(result.totals.variance, -172.0);
        assert_eq!(result.totals.status, LaborStatus::Under);
    }

    #[test]
    fn test_overstaffed_week_is_over() {
        let history = vec![point("2026-03-02", 500.0)];
        let shifts = vec![shift("2026-03-30", "manager", "08:00", "20:00")];
        let result = plan(date("2026-03-30"), date("2026-03-30"), &shifts, &history);
        assert_eq!(result.totals.variance, 135.0);
        assert_eq!(result.totals.status, LaborStatus::Over);
    }
}
