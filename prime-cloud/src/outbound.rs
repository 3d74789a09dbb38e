//! Errors from third-party HTTP APIs (Stripe, email, model, places)

use shared::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutboundError {
    /// Transport failure or non-JSON body
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    /// The provider answered with an error payload
    #[error("{service}: {message}")]
    Provider {
        service: &'static str,
        message: String,
    },
    /// The provider answered but the payload was not what we expected
    #[error("{service} returned an unexpected response: {detail}")]
    Unexpected {
        service: &'static str,
        detail: String,
    },
}

impl OutboundError {
    pub fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| OutboundError::Http { service, source }
    }

    pub fn provider(service: &'static str, message: impl Into<String>) -> Self {
        OutboundError::Provider {
            service,
            message: message.into(),
        }
    }

    pub fn unexpected(service: &'static str, detail: impl Into<String>) -> Self {
        OutboundError::Unexpected {
            service,
            detail: detail.into(),
        }
    }
}

/// Provider messages pass through to the caller as `IntegrationFailed`
impl From<OutboundError> for AppError {
    fn from(e: OutboundError) -> Self {
        tracing::warn!(error = %e, "Outbound call failed");
        AppError::integration(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_provider_message_passes_through() {
        let err: AppError = OutboundError::provider("Stripe", "No such price: 'price_x'").into();
        assert_eq!(err.code, ErrorCode::IntegrationFailed);
        assert_eq!(err.message, "Stripe: No such price: 'price_x'");
        assert_eq!(err.http_status(), http::StatusCode::BAD_GATEWAY);
    }
}
