//! Subscription tier gating
//!
//! The tier comes from the session claims; which features need `pro` is an
//! explicit [`TierPolicy`] carried in config.

use std::fmt;

use axum::{
    Extension,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use super::session::SessionIdentity;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Basic,
    Pro,
}

impl Tier {
    /// Unknown values fall back to basic
    pub fn from_claim(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pro" | "pro_yearly" => Tier::Pro,
            _ => Tier::Basic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Basic => "basic",
            Tier::Pro => "pro",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route groups that can be gated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Analytics,
    InvoiceScan,
    Places,
}

impl Feature {
    pub fn label(&self) -> &'static str {
        match self {
            Feature::Analytics => "Analytics",
            Feature::InvoiceScan => "Invoice scanning",
            Feature::Places => "Place search",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierPolicy {
    pro_features: Vec<Feature>,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            pro_features: vec![Feature::Analytics, Feature::InvoiceScan, Feature::Places],
        }
    }
}

impl TierPolicy {
    /// Every feature open to every tier
    pub fn disabled() -> Self {
        Self {
            pro_features: Vec::new(),
        }
    }

    pub fn requires_pro(&self, feature: Feature) -> bool {
        self.pro_features.contains(&feature)
    }

    pub fn check(&self, tier: Tier, feature: Feature) -> Result<(), AppError> {
        if tier < Tier::Pro && self.requires_pro(feature) {
            return Err(AppError::tier_required(feature.label()));
        }
        Ok(())
    }
}

/// Route layer: `from_fn_with_state((state, feature), require_tier)`.
///
/// Runs after [`super::session::require_session`].
pub async fn require_tier(
    State((state, feature)): State<(AppState, Feature)>,
    Extension(identity): Extension<SessionIdentity>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    state.config.tier_policy.check(identity.tier, feature).map_err(|e| {
        tracing::info!(user_id = %identity.user_id, tier = %identity.tier, ?feature, "Tier gate denied");
        e
    })?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_tier_from_claim() {
        assert_eq!(Tier::from_claim("pro"), Tier::Pro);
        assert_eq!(Tier::from_claim(" PRO "), Tier::Pro);
        assert_eq!(Tier::from_claim("basic"), Tier::Basic);
        assert_eq!(Tier::from_claim("enterprise-ish"), Tier::Basic);
    }

    #[test]
    fn test_default_policy_gates_pro_features() {
        let policy = TierPolicy::default();
        let err = policy.check(Tier::Basic, Feature::Analytics).unwrap_err();
        assert_eq!(err.code, ErrorCode::TierRequired);
        assert_eq!(err.message, "Analytics requires the pro tier");
        assert!(policy.check(Tier::Pro, Feature::Places).is_ok());
    }

    #[test]
    fn test_disabled_policy_allows_everything() {
        let policy = TierPolicy::disabled();
        assert!(policy.check(Tier::Basic, Feature::InvoiceScan).is_ok());
    }
}
