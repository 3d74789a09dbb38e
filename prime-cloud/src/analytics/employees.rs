//! Headcount, churn, tenure and hiring cost over a date range

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use shared::models::{Employee, EmployeeStatus};
use shared::util::{pct_of, round1, round2};

use super::DateRange;

const UNSPECIFIED: &str = "unspecified";

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeAnalytics {
    pub range: DateRange,
    pub active_headcount: u32,
    pub hires: u32,
    pub exits: u32,
    /// `exits / (active + exits) × 100`
    pub churn_pct: Option<f64>,
    /// Mean tenure of employees who exited in range
    pub avg_tenure_days: Option<f64>,
    pub exits_by_reason: BTreeMap<String, u32>,
    pub hires_by_source: BTreeMap<String, u32>,
    pub recruiting_spend: Option<f64>,
    pub cost_per_hire: Option<f64>,
}

/// Trailing 365 days ending today
pub fn default_range(today: NaiveDate) -> DateRange {
    DateRange::new(today - Duration::days(364), today)
}

fn label(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNSPECIFIED)
        .to_lowercase()
}

pub fn analyze(
    employees: &[Employee],
    range: DateRange,
    recruiting_spend: Option<f64>,
) -> EmployeeAnalytics {
    let active_headcount = employees
        .iter()
        .filter(|e| e.status == EmployeeStatus::Active)
        .count() as u32;

    let mut hires_by_source = BTreeMap::new();
    let mut hires = 0;
    for e in employees.iter().filter(|e| range.contains(e.hire_date)) {
        hires += 1;
        *hires_by_source.entry(label(e.source.as_deref())).or_insert(0) += 1;
    }

    let mut exits_by_reason = BTreeMap::new();
    let mut tenure_days = Vec::new();
    for e in employees {
        let Some(exit) = e.exit_date.filter(|d| range.contains(*d)) else {
            continue;
        };
        *exits_by_reason.entry(label(e.exit_reason.as_deref())).or_insert(0) += 1;
        tenure_days.push((exit - e.hire_date).num_days() as f64);
    }
    let exits = tenure_days.len() as u32;

    let avg_tenure_days = (!tenure_days.is_empty())
        .then(|| round1(tenure_days.iter().sum::<f64>() / tenure_days.len() as f64));

    let cost_per_hire = match recruiting_spend {
        Some(spend) if spend > 0.0 && hires > 0 => Some(round2(spend / hires as f64)),
        _ => None,
    };

    EmployeeAnalytics {
        range,
        active_headcount,
        hires,
        exits,
        churn_pct: pct_of(exits as f64, (active_headcount + exits) as f64),
        avg_tenure_days,
        exits_by_reason,
        hires_by_source,
        recruiting_spend,
        cost_per_hire,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::date;

    fn employee(hire: &str, exit: Option<(&str, &str)>, source: Option<&str>) -> Employee {
        Employee {
            id: 1,
            store_id: 1,
            name: "Alex".into(),
            role: "cook".into(),
            hire_date: date(hire),
            exit_date: exit.map(|(d, _)| date(d)),
            status: if exit.is_some() {
                EmployeeStatus::Exited
            } else {
                EmployeeStatus::Active
            },
            exit_reason: exit.map(|(_, r)| r.to_string()),
            source: source.map(String::from),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_churn_and_tenure() {
        let staff = vec![
            employee("2025-01-10", None, Some("Indeed")),
            employee("2026-02-01", None, Some("referral")),
            employee("2026-01-01", Some(("2026-03-02", "School")), Some("indeed")),
            employee("2025-12-01", Some(("2026-01-30", "")), None),
        ];
        let range = DateRange::new(date("2026-01-01"), date("2026-03-31"));
        let result = analyze(&staff, range, Some(900.0));

        assert_eq!(result.active_headcount, 2);
        assert_eq!(result.hires, 2);
        assert_eq!(result.exits, 2);
        assert_eq!(result.churn_pct, Some(50.0));
        // 60 and 60 days
        assert_eq!(result.avg_tenure_days, Some(60.0));
        assert_eq!(result.exits_by_reason.get("school"), Some(&1));
        assert_eq!(result.exits_by_reason.get("unspecified"), Some(&1));
        assert_eq!(result.hires_by_source.get("indeed"), Some(&1));
        assert_eq!(result.hires_by_source.get("referral"), Some(&1));
        assert_eq!(result.cost_per_hire, Some(450.0));
    }

    #[test]
    fn test_empty_roster_has_null_ratios() {
        let result = analyze(&[], default_range(date("2026-03-31")), Some(500.0));
        assert_eq!(result.churn_pct, None);
        assert_eq!(result.avg_tenure_days, None);
        assert_eq!(result.cost_per_hire, None);
        assert_eq!(result.range.from, date("2025-04-01"));
    }
}
