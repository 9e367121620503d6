//! Error handling for the gateway
//!
//! This module defines all error types used throughout the gateway.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Authorization header absent or not a bearer token
    #[error("Missing or invalid authorization header.")]
    AuthMissing,

    /// Bearer token does not match the configured access key
    #[error("Invalid access token.")]
    AuthInvalid,

    /// Auto-routing found no candidate model with an admissible key
    #[error("All models have reached their usage limits.")]
    NoAdmissibleModel,

    /// Every credential for the provider failed admission
    #[error("All keys for provider '{0}' have reached rate limits.")]
    AllKeysRateLimited(String),

    /// Upstream error text matched a known quota-exhaustion pattern
    #[error("Provider rate limit exceeded: {detail}")]
    ProviderQuotaExceeded {
        /// Provider that reported the exhaustion
        provider: String,
        /// Upstream error text
        detail: String,
    },

    /// Unclassified upstream failure
    #[error("Failed to complete {provider} request: {detail}")]
    Backend {
        /// Provider the request was dispatched to
        provider: String,
        /// Upstream error text
        detail: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Create a backend error for the given provider
    pub fn backend(provider: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Backend {
            provider: provider.into(),
            detail: detail.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::AuthMissing => StatusCode::UNAUTHORIZED,
            GatewayError::AuthInvalid => StatusCode::FORBIDDEN,
            GatewayError::NoAdmissibleModel
            | GatewayError::AllKeysRateLimited(_)
            | GatewayError::ProviderQuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_401_and_403() {
        assert_eq!(
            GatewayError::AuthMissing.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::AuthInvalid.status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_admission_errors_map_to_429() {
        let errors = [
            GatewayError::NoAdmissibleModel,
            GatewayError::AllKeysRateLimited("openrouter".to_string()),
            GatewayError::ProviderQuotaExceeded {
                provider: "gemini".to_string(),
                detail: "quota exceeded".to_string(),
            },
        ];
        for error in errors {
            assert_eq!(error.status_code(), StatusCode::TOO_MANY_REQUESTS);
        }
    }

    #[test]
    fn test_backend_error_maps_to_500() {
        let error = GatewayError::backend("openrouter", "connection reset");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            error.to_string(),
            "Failed to complete openrouter request: connection reset"
        );
    }

    #[test]
    fn test_quota_error_message_mentions_provider_rate_limit() {
        let error = GatewayError::ProviderQuotaExceeded {
            provider: "openrouter".to_string(),
            detail: "requests per day exceeded".to_string(),
        };
        assert!(
            error
                .to_string()
                .starts_with("Provider rate limit exceeded")
        );
    }
}
