//! Schedule (shift) Model
//!
//! `hours` and `labor_cost` are derived from start/end time and role and are
//! never accepted from the client.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::util::{normalize_clock, parse_clock, round2};

/// Hourly rate by role (USD)
pub const ROLE_RATES: &[(&str, f64)] = &[
    ("manager", 20.0),
    ("shift_lead", 16.0),
    ("cook", 14.0),
    ("cashier", 12.0),
    ("driver", 12.0),
    ("dishwasher", 11.0),
];

/// Rate used for roles missing from [`ROLE_RATES`]
pub const FALLBACK_RATE: f64 = 13.0;

/// Hourly rate for a role name; case and separators are ignored.
pub fn role_rate(role: &str) -> f64 {
    let key = role.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    ROLE_RATES
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(FALLBACK_RATE, |(_, rate)| *rate)
}

/// Decimal hours plus the canonical text of a clock field
fn clock_field(field: &str, value: &str) -> AppResult<(f64, String)> {
    parse_clock(value)
        .zip(normalize_clock(value))
        .ok_or_else(|| AppError::validation(format!("Invalid {field}: {value}")))
}

/// Derived shift figures, with the clock times in canonical `"HH:MM"` form
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftCost {
    pub start_time: String,
    pub end_time: String,
    pub hours: f64,
    pub labor_cost: f64,
}

impl ShiftCost {
    /// `hours = end − start`, `labor_cost = hours × rate(role)`.
    pub fn compute(role: &str, start_time: &str, end_time: &str) -> AppResult<Self> {
        let (start, start_time) = clock_field("start_time", start_time)?;
        let (end, end_time) = clock_field("end_time", end_time)?;
        if end <= start {
            return Err(AppError::validation("end_time must be after start_time"));
        }
        let hours = round2(end - start);
        Ok(Self {
            start_time,
            end_time,
            hours,
            labor_cost: round2(hours * role_rate(role)),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: i64,
    pub store_id: i64,
    pub employee_name: String,
    pub role: String,
    pub shift_date: NaiveDate,
    /// `"HH:MM"`
    pub start_time: String,
    /// `"HH:MM"`
    pub end_time: String,
    pub hours: f64,
    pub labor_cost: f64,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftCreate {
    pub store_id: i64,
    pub employee_name: String,
    pub role: String,
    /// Optional on the wire so a missing date is reported as a validation error
    pub shift_date: Option<NaiveDate>,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftUpdate {
    pub employee_name: Option<String>,
    pub role: Option<String>,
    pub shift_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub notes: Option<String>,
}

impl Shift {
    /// Build a new row from a create payload.
    pub fn from_create(id: i64, data: ShiftCreate, now: i64) -> AppResult<Self> {
        let shift_date = data.shift_date.ok_or_else(|| AppError::required("shift_date"))?;
        if data.employee_name.trim().is_empty() {
            return Err(AppError::required("employee_name"));
        }
        let cost = ShiftCost::compute(&data.role, &data.start_time, &data.end_time)?;
        Ok(Self {
            id,
            store_id: data.store_id,
            employee_name: data.employee_name,
            role: data.role,
            shift_date,
            start_time: cost.start_time,
            end_time: cost.end_time,
            hours: cost.hours,
            labor_cost: cost.labor_cost,
            notes: data.notes,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merge a partial update, then recompute derived fields from the merged row.
    pub fn apply_update(&mut self, data: ShiftUpdate, now: i64) -> AppResult<()> {
        if let Some(v) = data.employee_name {
            self.employee_name = v;
        }
        if let Some(v) = data.role {
            self.role = v;
        }
        if let Some(v) = data.shift_date {
            self.shift_date = v;
        }
        if let Some(v) = data.start_time {
            self.start_time = v;
        }
        if let Some(v) = data.end_time {
            self.end_time = v;
        }
        if data.notes.is_some() {
            self.notes = data.notes;
        }
        let cost = ShiftCost::compute(&self.role, &self.start_time, &self.end_time)?;
        self.start_time = cost.start_time;
        self.end_time = cost.end_time;
        self.hours = cost.hours;
        self.labor_cost = cost.labor_cost;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn create(role: &str, start: &str, end: &str) -> ShiftCreate {
        ShiftCreate {
            store_id: 1,
            employee_name: "Sam".into(),
            role: role.into(),
            shift_date: NaiveDate::from_ymd_opt(2026, 2, 3),
            start_time: start.into(),
            end_time: end.into(),
            notes: None,
        }
    }

    #[test]
    fn test_cook_shift_cost() {
        let shift = Shift::from_create(1, create("cook", "09:00", "17:00"), 0).unwrap();
        assert_eq!(shift.hours, 8.0);
        assert_eq!(shift.labor_cost, 112.0);
    }

    #[test]
    fn test_unknown_role_uses_fallback_rate() {
        assert_eq!(role_rate("sommelier"), FALLBACK_RATE);
        assert_eq!(role_rate("Shift Lead"), 16.0);
        assert_eq!(role_rate(" COOK "), 14.0);
    }

    #[test]
    fn test_partial_minutes() {
        let cost = ShiftCost::compute("driver", "16:30", "21:15").unwrap();
        assert_eq!(cost.hours, 4.75);
        assert_eq!(cost.labor_cost, 57.0);
    }

    #[test]
    fn test_missing_date_rejected() {
        let mut data = create("cook", "09:00", "17:00");
        data.shift_date = None;
        let err = Shift::from_create(1, data, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
    }

    #[test]
    fn test_end_before_start_rejected() {
        let err = ShiftCost::compute("cook", "17:00", "09:00").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(ShiftCost::compute("cook", "9am", "17:00").is_err());
    }

    #[test]
    fn test_update_recomputes_from_merged_row() {
        let mut shift = Shift::from_create(1, create("cook", "09:00", "17:00"), 0).unwrap();

        // Only the role changes: hours come from the stored times.
        shift
            .apply_update(
                ShiftUpdate {
                    role: Some("manager".into()),
                    ..Default::default()
                },
                5,
            )
            .unwrap();
        assert_eq!(shift.hours, 8.0);
        assert_eq!(shift.labor_cost, 160.0);

        // Only the end time changes: rate comes from the stored role.
        shift
            .apply_update(
                ShiftUpdate {
                    end_time: Some("13:00".into()),
                    ..Default::default()
                },
                6,
            )
            .unwrap();
        assert_eq!(shift.hours, 4.0);
        assert_eq!(shift.labor_cost, 80.0);
        assert_eq!(shift.updated_at, 6);
    }

    #[test]
    fn test_update_with_invalid_merge_is_rejected() {
        let mut shift = Shift::from_create(1, create("cook", "09:00", "17:00"), 0).unwrap();
        let result = shift.apply_update(
            ShiftUpdate {
                start_time: Some("18:00".into()),
                ..Default::default()
            },
            1,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_times_stored_zero_padded() {
        let mut shift = Shift::from_create(1, create("cook", "9:00", "13:00"), 0).unwrap();
        assert_eq!(shift.start_time, "09:00");
        assert_eq!(shift.end_time, "13:00");

        let later = Shift::from_create(2, create("cook", "10:00", "14:00"), 0).unwrap();
        assert!(shift.start_time < later.start_time);

        shift
            .apply_update(
                ShiftUpdate {
                    start_time: Some("7".into()),
                    end_time: Some("9:30:00".into()),
                    ..Default::default()
                },
                1,
            )
            .unwrap();
        assert_eq!(shift.start_time, "07:00");
        assert_eq!(shift.end_time, "09:30");
        assert_eq!(shift.hours, 2.5);
    }
}
