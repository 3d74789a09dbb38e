//! Store Model

use serde::{Deserialize, Serialize};

/// A restaurant location; every other entity is scoped by `store_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Store {
    pub id: i64,
    /// URL-safe unique key, e.g. `"downtown"`
    pub slug: String,
    pub name: String,
    /// Address that receives order notifications
    pub email: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreate {
    pub slug: String,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Slugs are lowercase ASCII letters, digits and dashes.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 64
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("downtown-2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Downtown"));
        assert!(!is_valid_slug("north side"));
    }
}
