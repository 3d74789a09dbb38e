//! Session JWT validation
//!
//! Tokens are issued by the managed auth provider (HS256, shared secret).
//! This service only validates them and exposes the caller as a
//! [`SessionIdentity`] request extension.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use super::tier::Tier;
use crate::state::AppState;

/// Provider-specific claims live under `app_metadata`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppMetadata {
    #[serde(default)]
    pub tier: Option<String>,
}

/// JWT claims issued by the auth provider
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: String,
    #[serde(default)]
    pub email: String,
    /// Subscription tier (`basic` | `pro`)
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub app_metadata: Option<AppMetadata>,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
}

impl SessionClaims {
    /// Top-level `tier` wins over `app_metadata.tier`; absent means basic.
    pub fn tier(&self) -> Tier {
        self.tier
            .as_deref()
            .or_else(|| self.app_metadata.as_ref().and_then(|m| m.tier.as_deref()))
            .map(Tier::from_claim)
            .unwrap_or_default()
    }
}

/// Authenticated caller extracted from the JWT
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub user_id: String,
    pub email: String,
    pub tier: Tier,
}

pub fn decode_session(token: &str, secret: &str) -> Result<SessionIdentity, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Provider tokens carry an `aud` we do not pin
    validation.validate_aud = false;

    let data = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::new(ErrorCode::TokenExpired)
            }
            _ => AppError::invalid_token("Invalid or expired token"),
        }
    })?;

    let tier = data.claims.tier();
    Ok(SessionIdentity {
        user_id: data.claims.sub,
        email: data.claims.email,
        tier,
    })
}

/// Middleware that verifies the bearer token and inserts [`SessionIdentity`]
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(AppError::not_authenticated)?;

    let identity = decode_session(token, &state.config.jwt_secret)?;
    tracing::Span::current().record("user_id", identity.user_id.as_str());

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Sign a session token the way the auth provider does (tests only)
#[cfg(test)]
pub(crate) fn test_token(secret: &str, user_id: &str, tier: Option<&str>) -> String {
    use jsonwebtoken::{EncodingKey, Header};

    let claims = SessionClaims {
        sub: user_id.to_string(),
        email: format!("{user_id}@example.com"),
        tier: tier.map(String::from),
        app_metadata: None,
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_token() {
        let token = test_token("secret", "user-1", Some("pro"));
        let identity = decode_session(&token, "secret").unwrap();
        assert_eq!(identity.user_id, "user-1");
        assert_eq!(identity.email, "user-1@example.com");
        assert_eq!(identity.tier, Tier::Pro);
    }

    #[test]
    fn test_missing_tier_defaults_to_basic() {
        let token = test_token("secret", "user-2", None);
        let identity = decode_session(&token, "secret").unwrap();
        assert_eq!(identity.tier, Tier::Basic);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = test_token("secret", "user-1", None);
        let err = decode_session(&token, "other").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_app_metadata_tier() {
        let claims = SessionClaims {
            sub: "u".into(),
            email: String::new(),
            tier: None,
            app_metadata: Some(AppMetadata {
                tier: Some("pro".into()),
            }),
            exp: 0,
        };
        assert_eq!(claims.tier(), Tier::Pro);
    }
}
