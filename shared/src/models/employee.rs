//! Employee Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "employee_status", rename_all = "lowercase")
)]
pub enum EmployeeStatus {
    #[default]
    Active,
    Exited,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    pub role: String,
    pub hire_date: NaiveDate,
    pub exit_date: Option<NaiveDate>,
    pub status: EmployeeStatus,
    pub exit_reason: Option<String>,
    /// Hiring source, e.g. `"indeed"`, `"referral"`
    pub source: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub store_id: i64,
    pub name: String,
    pub role: String,
    pub hire_date: Option<NaiveDate>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub exit_date: Option<NaiveDate>,
    pub status: Option<EmployeeStatus>,
    pub exit_reason: Option<String>,
    pub source: Option<String>,
}

impl Employee {
    /// A missing hire date defaults to `today`.
    pub fn from_create(
        id: i64,
        data: EmployeeCreate,
        today: NaiveDate,
        now: i64,
    ) -> AppResult<Self> {
        if data.name.trim().is_empty() {
            return Err(AppError::required("name"));
        }
        Ok(Self {
            id,
            store_id: data.store_id,
            name: data.name,
            role: data.role,
            hire_date: data.hire_date.unwrap_or(today),
            exit_date: None,
            status: EmployeeStatus::Active,
            exit_reason: None,
            source: data.source,
            created_at: now,
            updated_at: now,
        })
    }

    /// Exiting without a date stamps `today`; reactivating clears exit data.
    pub fn apply_update(
        &mut self,
        data: EmployeeUpdate,
        today: NaiveDate,
        now: i64,
    ) -> AppResult<()> {
        if let Some(v) = data.name {
            self.name = v;
        }
        if let Some(v) = data.role {
            self.role = v;
        }
        if let Some(v) = data.hire_date {
            self.hire_date = v;
        }
        if data.source.is_some() {
            self.source = data.source;
        }
        if data.exit_reason.is_some() {
            self.exit_reason = data.exit_reason;
        }
        if data.exit_date.is_some() {
            self.exit_date = data.exit_date;
            self.status = EmployeeStatus::Exited;
        }
        match data.status {
            Some(EmployeeStatus::Exited) => {
                self.status = EmployeeStatus::Exited;
                self.exit_date = self.exit_date.or(Some(today));
            }
            Some(EmployeeStatus::Active) => {
                self.status = EmployeeStatus::Active;
                self.exit_date = None;
                self.exit_reason = None;
            }
            None => {}
        }
        if let Some(exit) = self.exit_date
            && exit < self.hire_date
        {
            return Err(AppError::validation("exit_date is before hire_date"));
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn employee() -> Employee {
        Employee::from_create(
            1,
            EmployeeCreate {
                store_id: 1,
                name: "Jo".into(),
                role: "driver".into(),
                hire_date: Some(date(2025, 6, 1)),
                source: Some("referral".into()),
            },
            date(2026, 1, 1),
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_exit_without_date_uses_today() {
        let mut e = employee();
        e.apply_update(
            EmployeeUpdate {
                status: Some(EmployeeStatus::Exited),
                exit_reason: Some("moved".into()),
                ..Default::default()
            },
            date(2026, 2, 10),
            1,
        )
        .unwrap();
        assert_eq!(e.status, EmployeeStatus::Exited);
        assert_eq!(e.exit_date, Some(date(2026, 2, 10)));
    }

    #[test]
    fn test_exit_date_implies_exited() {
        let mut e = employee();
        e.apply_update(
            EmployeeUpdate {
                exit_date: Some(date(2026, 1, 15)),
                ..Default::default()
            },
            date(2026, 2, 10),
            1,
        )
        .unwrap();
        assert_eq!(e.status, EmployeeStatus::Exited);
        assert_eq!(e.exit_date, Some(date(2026, 1, 15)));
    }

    #[test]
    fn test_rehire_clears_exit() {
        let mut e = employee();
        e.apply_update(
            EmployeeUpdate {
                status: Some(EmployeeStatus::Exited),
                ..Default::default()
            },
            date(2026, 2, 10),
            1,
        )
        .unwrap();
        e.apply_update(
            EmployeeUpdate {
                status: Some(EmployeeStatus::Active),
                ..Default::default()
            },
            date(2026, 3, 1),
            2,
        )
        .unwrap();
        assert_eq!(e.exit_date, None);
        assert_eq!(e.exit_reason, None);
    }

    #[test]
    fn test_exit_before_hire_rejected() {
        let mut e = employee();
        let result = e.apply_update(
            EmployeeUpdate {
                exit_date: Some(date(2025, 1, 1)),
                ..Default::default()
            },
            date(2026, 2, 10),
            1,
        );
        assert!(result.is_err());
    }
}
