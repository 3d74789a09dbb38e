//! Trusted Contact Model (vendors, repair techs, emergency numbers)

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TrustedContact {
    pub id: i64,
    /// `None` means shared across all stores
    pub store_id: Option<i64>,
    pub category: String,
    pub name: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustedContactCreate {
    pub store_id: Option<i64>,
    pub category: String,
    pub name: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrustedContactUpdate {
    pub category: Option<String>,
    pub name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl TrustedContact {
    pub fn from_create(id: i64, data: TrustedContactCreate, now: i64) -> AppResult<Self> {
        if data.name.trim().is_empty() {
            return Err(AppError::required("name"));
        }
        if data.phone.is_none() && data.email.is_none() {
            return Err(AppError::validation("A phone or email is required"));
        }
        Ok(Self {
            id,
            store_id: data.store_id,
            category: data.category,
            name: data.name,
            company: data.company,
            phone: data.phone,
            email: data.email,
            notes: data.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, data: TrustedContactUpdate, now: i64) -> AppResult<()> {
        if let Some(v) = data.category {
            self.category = v;
        }
        if let Some(v) = data.name {
            self.name = v;
        }
        if data.company.is_some() {
            self.company = data.company;
        }
        if data.phone.is_some() {
            self.phone = data.phone;
        }
        if data.email.is_some() {
            self.email = data.email;
        }
        if data.notes.is_some() {
            self.notes = data.notes;
        }
        if self.name.trim().is_empty() {
            return Err(AppError::required("name"));
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plumber() -> TrustedContact {
        TrustedContact::from_create(
            1,
            TrustedContactCreate {
                store_id: None,
                category: "repair".into(),
                name: "Joe's Plumbing".into(),
                company: None,
                phone: Some("555-0100".into()),
                email: None,
                notes: None,
            },
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_contact_needs_phone_or_email() {
        let result = TrustedContact::from_create(
            1,
            TrustedContactCreate {
                store_id: Some(1),
                category: "vendor".into(),
                name: "Sysco rep".into(),
                company: None,
                phone: None,
                email: None,
                notes: None,
            },
            0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_keeps_name_required() {
        let mut c = plumber();
        let result = c.apply_update(
            TrustedContactUpdate {
                name: Some(" ".into()),
                ..Default::default()
            },
            1,
        );
        assert!(result.is_err());

        c.apply_update(
            TrustedContactUpdate {
                email: Some("joe@example.com".into()),
                ..Default::default()
            },
            2,
        )
        .unwrap();
        assert_eq!(c.email.as_deref(), Some("joe@example.com"));
        assert_eq!(c.updated_at, 2);
    }
}
