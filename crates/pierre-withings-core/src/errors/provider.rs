// ABOUTME: Structured error types for Withings provider operations
// ABOUTME: Maps provider-reported status codes to typed failures with retry hints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::ErrorCode;
use crate::constants::status;
use thiserror::Error;

/// Failures reported by, or while talking to, the Withings API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The refresh-token exchange was rejected or could not complete
    #[error("{provider} token refresh failed: {reason}")]
    TokenRefreshFailed {
        /// Provider name
        provider: String,
        /// Why the refresh failed
        reason: String,
    },

    /// The provider rejected the access token or authorization code
    #[error("{provider} authentication failed: {reason}")]
    AuthenticationFailed {
        /// Provider name
        provider: String,
        /// Why authentication failed
        reason: String,
    },

    /// The provider throttled the call
    #[error("{provider} rate limit exceeded (status {status})")]
    RateLimitExceeded {
        /// Provider name
        provider: String,
        /// Provider status code
        status: i64,
    },

    /// Any other provider-reported failure
    #[error("{provider} API error (status {status}): {message}")]
    ApiError {
        /// Provider name
        provider: String,
        /// Provider or HTTP status code
        status: i64,
        /// Message returned by the provider
        message: String,
    },

    /// The request never produced a response
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response could not be decoded
    #[error("{provider} returned an invalid response: {reason}")]
    InvalidResponse {
        /// Provider name
        provider: String,
        /// Decoding failure
        reason: String,
    },

    /// The request could not be constructed; nothing was sent
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// Client configuration is unusable
    #[error("{provider} configuration error: {details}")]
    ConfigurationError {
        /// Provider name
        provider: String,
        /// What is wrong
        details: String,
    },
}

impl ProviderError {
    /// Classify a non-zero `status` field returned in a Withings response body
    #[must_use]
    pub fn from_status(provider: &str, status_code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            100..=102 | 200 | status::INVALID_TOKEN => Self::AuthenticationFailed {
                provider: provider.to_owned(),
                reason: if message.is_empty() {
                    format!("status {status_code}")
                } else {
                    message
                },
            },
            status::TOO_MANY_REQUESTS => Self::RateLimitExceeded {
                provider: provider.to_owned(),
                status: status_code,
            },
            _ => Self::ApiError {
                provider: provider.to_owned(),
                status: status_code,
                message,
            },
        }
    }

    /// Whether repeating the same call later could succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. } | Self::NetworkError(_))
    }

    /// Coarse error code used when converting into `AppError`
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::TokenRefreshFailed { .. } | Self::AuthenticationFailed { .. } => {
                ErrorCode::ExternalAuthFailed
            }
            Self::RateLimitExceeded { .. } => ErrorCode::ExternalRateLimited,
            Self::ApiError { .. } => ErrorCode::ExternalServiceError,
            Self::NetworkError(_) => ErrorCode::ExternalServiceUnavailable,
            Self::InvalidResponse { .. } => ErrorCode::SerializationError,
            Self::RequestBuild(_) => ErrorCode::InternalError,
            Self::ConfigurationError { .. } => ErrorCode::ConfigInvalid,
        }
    }
}

/// Result alias for provider-level operations
pub type ProviderResult<T> = Result<T, ProviderError>;
