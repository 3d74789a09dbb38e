//! This week vs last week vs same week last year, plus PTD/YTD

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use shared::util::{month_start, one_year_earlier, pct_change, round2, week_start};

use super::{DateRange, SalesPoint, WEEKDAYS, bucket_by_weekday, weekday_index};

/// Weekday-aligned: 52 weeks back
const YEAR_OF_WEEKS_DAYS: i64 = 364;

/// The seven calendar ranges compared as of one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonRanges {
    pub this_week: DateRange,
    pub last_week: DateRange,
    pub same_week_last_year: DateRange,
    pub period_to_date: DateRange,
    pub prior_period_to_date: DateRange,
    pub year_to_date: DateRange,
    pub prior_year_to_date: DateRange,
}

impl ComparisonRanges {
    pub fn as_of(today: NaiveDate) -> Self {
        let this_week = DateRange::week(week_start(today));
        let month = month_start(today);
        let year = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(month);
        Self {
            this_week,
            last_week: this_week.shift_days(-7),
            same_week_last_year: this_week.shift_days(-YEAR_OF_WEEKS_DAYS),
            period_to_date: DateRange::new(month, today),
            prior_period_to_date: DateRange::new(
                one_year_earlier(month),
                one_year_earlier(today),
            ),
            year_to_date: DateRange::new(year, today),
            prior_year_to_date: DateRange::new(one_year_earlier(year), one_year_earlier(today)),
        }
    }
}

/// Fetched rows, one set per range in [`ComparisonRanges`]
#[derive(Debug, Clone, Default)]
pub struct ComparisonInputs {
    pub this_week: Vec<SalesPoint>,
    pub last_week: Vec<SalesPoint>,
    pub same_week_last_year: Vec<SalesPoint>,
    pub period_to_date: Vec<SalesPoint>,
    pub prior_period_to_date: Vec<SalesPoint>,
    pub year_to_date: Vec<SalesPoint>,
    pub prior_year_to_date: Vec<SalesPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekdaySales {
    pub day: &'static str,
    pub this_week: f64,
    pub last_week: f64,
    pub last_year: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekComparison {
    pub range: DateRange,
    /// Days compared, Monday through today
    pub days_elapsed: usize,
    pub this_week_to_date: f64,
    pub last_week_to_date: f64,
    pub last_year_to_date: f64,
    pub wow_pct: Option<f64>,
    pub yoy_pct: Option<f64>,
    pub this_week_total: f64,
    pub last_week_total: f64,
    pub last_year_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodComparison {
    pub current: DateRange,
    pub prior: DateRange,
    pub current_sales: f64,
    pub prior_sales: f64,
    pub change_pct: Option<f64>,
}

impl PeriodComparison {
    fn new(
        current: DateRange,
        prior: DateRange,
        current_rows: &[SalesPoint],
        prior_rows: &[SalesPoint],
    ) -> Self {
        let current_sales = total(current_rows);
        let prior_sales = total(prior_rows);
        Self {
            current,
            prior,
            current_sales,
            prior_sales,
            change_pct: pct_change(current_sales, prior_sales),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesComparison {
    pub as_of: NaiveDate,
    pub days: Vec<WeekdaySales>,
    pub week: WeekComparison,
    pub period_to_date: PeriodComparison,
    pub year_to_date: PeriodComparison,
}

fn total(rows: &[SalesPoint]) -> f64 {
    round2(rows.iter().map(|r| r.net_sales).sum())
}

fn sum_through(buckets: &[f64; 7], last_index: usize) -> f64 {
    round2(buckets[..=last_index].iter().sum())
}

pub fn compare(
    today: NaiveDate,
    ranges: &ComparisonRanges,
    inputs: &ComparisonInputs,
) -> SalesComparison {
    let this_week = bucket_by_weekday(&inputs.this_week);
    let last_week = bucket_by_weekday(&inputs.last_week);
    let last_year = bucket_by_weekday(&inputs.same_week_last_year);

    let days = WEEKDAYS
        .iter()
        .enumerate()
        .map(|(i, &day)| WeekdaySales {
            day,
            this_week: round2(this_week[i]),
            last_week: round2(last_week[i]),
            last_year: round2(last_year[i]),
        })
        .collect();

    let through = weekday_index(today);
    let this_week_to_date = sum_through(&this_week, through);
    let last_week_to_date = sum_through(&last_week, through);
    let last_year_to_date = sum_through(&last_year, through);

    SalesComparison {
        as_of: today,
        days,
        week: WeekComparison {
            range: ranges.this_week,
            days_elapsed: through + 1,
            this_week_to_date,
            last_week_to_date,
            last_year_to_date,
            wow_pct: pct_change(this_week_to_date, last_week_to_date),
            yoy_pct: pct_change(this_week_to_date, last_year_to_date),
            this_week_total: sum_through(&this_week, 6),
            last_week_total: sum_through(&last_week, 6),
            last_year_total: sum_through(&last_year, 6),
        },
        period_to_date: PeriodComparison::new(
            ranges.period_to_date,
            ranges.prior_period_to_date,
            &inputs.period_to_date,
            &inputs.prior_period_to_date,
        ),
        year_to_date: PeriodComparison::new(
            ranges.year_to_date,
            ranges.prior_year_to_date,
            &inputs.year_to_date,
            &inputs.prior_year_to_date,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{date, point};

    #[test]
    fn test_ranges_as_of_wednesday() {
        let ranges = ComparisonRanges::as_of(date("2026-03-04"));
        assert_eq!(
            ranges.this_week,
            DateRange::new(date("2026-03-02"), date("2026-03-08"))
        );
        assert_eq!(ranges.last_week.from, date("2026-02-23"));
        assert_eq!(ranges.same_week_last_year.from, date("2025-03-03"));
        assert_eq!(ranges.period_to_date.from, date("2026-03-01"));
        assert_eq!(
            ranges.prior_period_to_date,
            DateRange::new(date("2025-03-01"), date("2025-03-04"))
        );
        assert_eq!(ranges.year_to_date.from, date("2026-01-01"));
        assert_eq!(ranges.prior_year_to_date.to, date("2025-03-04"));
    }

    #[test]
    fn test_leap_day_clamps_prior_year() {
        let ranges = ComparisonRanges::as_of(date("2028-02-29"));
        assert_eq!(ranges.prior_period_to_date.to, date("2027-02-28"));
    }

    #[test]
    fn test_week_deltas_compare_elapsed_days_only() {
        let today = date("2026-03-04");
        let ranges = ComparisonRanges::as_of(today);
        let inputs = ComparisonInputs {
            this_week: vec![point("2026-03-02", 1000.0), point("2026-03-03", 1100.0)],
            last_week: vec![
                point("2026-02-23", 1000.0),
                point("2026-02-24", 1000.0),
                // Saturday; outside Monday..Wednesday
                point("2026-02-28", 5000.0),
            ],
            ..Default::default()
        };
        let result = compare(today, &ranges, &inputs);
        assert_eq!(result.week.days_elapsed, 3);
        assert_eq!(result.week.this_week_to_date, 2100.0);
        assert_eq!(result.week.last_week_to_date, 2000.0);
        assert_eq!(result.week.wow_pct, Some(5.0));
        assert_eq!(result.week.last_week_total, 7000.0);
        assert_eq!(result.days[5].last_week, 5000.0);
    }

    #[test]
    fn test_zero_baselines_are_null() {
        let today = date("2026-03-04");
        let ranges = ComparisonRanges::as_of(today);
        let inputs = ComparisonInputs {
            this_week: vec![point("2026-03-02", 800.0)],
            period_to_date: vec![point("2026-03-02", 800.0)],
            year_to_date: vec![point("2026-03-02", 800.0)],
            ..Default::default()
        };
        let result = compare(today, &ranges, &inputs);
        assert_eq!(result.week.wow_pct, None);
        assert_eq!(result.week.yoy_pct, None);
        assert_eq!(result.period_to_date.change_pct, None);
        assert_eq!(result.year_to_date.change_pct, None);

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["week"]["wow_pct"].is_null());
        assert!(json["period_to_date"]["change_pct"].is_null());
    }

    #[test]
    fn test_same_inputs_same_json() {
        let today = date("2026-03-04");
        let ranges = ComparisonRanges::as_of(today);
        let inputs = ComparisonInputs {
            this_week: vec![point("2026-03-02", 1234.5)],
            same_week_last_year: vec![point("2025-03-03", 1000.0)],
            ..Default::default()
        };
        let a = serde_json::to_string(&compare(today, &ranges, &inputs)).unwrap();
        let b = serde_json::to_string(&compare(today, &ranges, &inputs)).unwrap();
        assert_eq!(a, b);
    }
}
