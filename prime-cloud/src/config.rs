//! Cloud server configuration

use crate::auth::tier::TierPolicy;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Stripe REST credentials and prices (all optional; billing is off without a key)
#[derive(Debug, Clone, Default)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub pro_price_id: Option<String>,
    pub basic_price_id: Option<String>,
}

/// Transactional email API
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: Option<String>,
    pub from: String,
}

/// Multimodal model API used for invoice scanning
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub model: String,
}

/// Cloud server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret shared with the auth provider
    pub jwt_secret: String,
    pub stripe: StripeConfig,
    /// Front-end origin used for checkout and portal return URLs
    pub app_base_url: String,
    pub email: EmailConfig,
    pub model: ModelConfig,
    /// Places API key
    pub maps_api_key: Option<String>,
    pub tier_policy: TierPolicy,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Require a secret: must be set and non-empty outside development.
    fn require_secret(
        lookup: &impl Fn(&str) -> Option<String>,
        name: &str,
        environment: &str,
    ) -> Result<String, BoxError> {
        let val = match lookup(name) {
            Some(v) => v,
            None => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let http_port = match optional("HTTP_PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| format!("HTTP_PORT is not a valid port: {p}"))?,
            None => 8080,
        };

        let tier_gating = optional("TIER_GATING")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "off" | "false" | "0"))
            .unwrap_or(true);

        Ok(Self {
            database_url: optional("DATABASE_URL").ok_or("DATABASE_URL must be set")?,
            http_port,
            jwt_secret: Self::require_secret(&lookup, "AUTH_JWT_SECRET", &environment)?,
            environment,
            stripe: StripeConfig {
                secret_key: optional("STRIPE_SECRET_KEY"),
                webhook_secret: optional("STRIPE_WEBHOOK_SECRET"),
                pro_price_id: optional("STRIPE_PRO_PRICE_ID"),
                basic_price_id: optional("STRIPE_BASIC_PRICE_ID"),
            },
            app_base_url: optional("APP_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:3000".into()),
            email: EmailConfig {
                api_key: optional("EMAIL_API_KEY"),
                from: optional("EMAIL_FROM").unwrap_or_else(|| "PrimeOS <noreply@primeos.app>".into()),
            },
            model: ModelConfig {
                api_key: optional("MODEL_API_KEY"),
                model: optional("MODEL_NAME").unwrap_or_else(|| "claude-sonnet-4-5".into()),
            },
            maps_api_key: optional("MAPS_API_KEY"),
            tier_policy: if tier_gating {
                TierPolicy::default()
            } else {
                TierPolicy::disabled()
            },
            cors_origins: optional("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tier::Feature;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_in_development() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/prime")]))
            .unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.environment, "development");
        assert!(config.jwt_secret.starts_with("dev-"));
        assert!(config.stripe.secret_key.is_none());
        assert!(config.tier_policy.requires_pro(Feature::Analytics));
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_database_url_required() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_jwt_secret_required_in_production() {
        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/prime"),
            ("ENVIRONMENT", "production"),
        ]));
        assert!(result.is_err());

        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/prime"),
            ("ENVIRONMENT", "production"),
            ("AUTH_JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.jwt_secret, "s3cret");
    }

    #[test]
    fn test_optional_values() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/prime"),
            ("HTTP_PORT", "9000"),
            ("STRIPE_SECRET_KEY", "sk_test_1"),
            ("MAPS_API_KEY", ""),
            ("APP_BASE_URL", "https://dash.example.com/"),
            ("TIER_GATING", "off"),
            ("CORS_ORIGINS", "https://a.example.com, https://b.example.com"),
        ]))
        .unwrap();
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.stripe.secret_key.as_deref(), Some("sk_test_1"));
        assert!(config.maps_api_key.is_none());
        assert_eq!(config.app_base_url, "https://dash.example.com");
        assert!(!config.tier_policy.requires_pro(Feature::Analytics));
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/prime"),
            ("HTTP_PORT", "eighty"),
        ]));
        assert!(result.is_err());
    }
}
