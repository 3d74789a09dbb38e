//! Approval status shared by invoices and party orders

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "approval_status", rename_all = "lowercase")
)]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
}

/// Resolve `approved_at` for a status change.
///
/// Set exactly when the status moves into `Approved`, kept while it stays
/// approved, cleared when it goes back to `Pending`.
pub fn approval_timestamp(
    previous: ApprovalStatus,
    next: ApprovalStatus,
    previous_at: Option<i64>,
    now: i64,
) -> Option<i64> {
    match (previous, next) {
        (ApprovalStatus::Pending, ApprovalStatus::Approved) => Some(now),
        (ApprovalStatus::Approved, ApprovalStatus::Approved) => previous_at.or(Some(now)),
        (_, ApprovalStatus::Pending) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_to_approved_sets_timestamp() {
        let at = approval_timestamp(ApprovalStatus::Pending, ApprovalStatus::Approved, None, 42);
        assert_eq!(at, Some(42));
    }

    #[test]
    fn test_reapproval_keeps_original_timestamp() {
        let at = approval_timestamp(
            ApprovalStatus::Approved,
            ApprovalStatus::Approved,
            Some(10),
            42,
        );
        assert_eq!(at, Some(10));
    }

    #[test]
    fn test_back_to_pending_clears_timestamp() {
        let at = approval_timestamp(
            ApprovalStatus::Approved,
            ApprovalStatus::Pending,
            Some(10),
            42,
        );
        assert_eq!(at, None);
        let at = approval_timestamp(ApprovalStatus::Pending, ApprovalStatus::Pending, None, 42);
        assert_eq!(at, None);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ApprovalStatus::Approved).unwrap(),
            "\"approved\""
        );
    }
}
