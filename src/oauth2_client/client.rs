// ABOUTME: Withings OAuth2 client for authorization URLs, code exchange, refresh and data calls
// ABOUTME: Sends bearer-authenticated requests and maps Withings status codes to provider errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::token::{AccessToken, TokenGrant};
use crate::api::{ApiEnvelope, WithingsRequest};
use crate::config::WithingsConfig;
use crate::constants::{
    actions, endpoints,
    oauth::{self, PROVIDER_NAME},
};
use crate::errors::{AppError, AppResult, ProviderError};
use crate::session::{AuthorizedSession, Clock, SystemClock, TokenRefresher};
use crate::utils::http_client::{create_api_client, create_no_redirect_client};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use rand::RngCore;
use reqwest::{Response, StatusCode};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Authorization page URL together with the `state` it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// URL the user must visit to grant access
    pub url: Url,
    /// `state` value the redirect must echo back
    pub state: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grant {
    AuthorizationCode,
    RefreshToken,
}

impl Grant {
    fn rejected(self, reason: String) -> ProviderError {
        let provider = PROVIDER_NAME.to_owned();
        match self {
            Self::AuthorizationCode => ProviderError::AuthenticationFailed { provider, reason },
            Self::RefreshToken => ProviderError::TokenRefreshFailed { provider, reason },
        }
    }
}

/// Client for one registered Withings application
pub struct WithingsClient {
    config: WithingsConfig,
    http: reqwest::Client,
    demo_http: reqwest::Client,
    clock: Arc<dyn Clock>,
}

impl WithingsClient {
    /// Create a client from its configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built
    pub fn new(config: WithingsConfig) -> AppResult<Self> {
        let http = create_api_client(&config.http, config.skip_tls_verify)?;
        let demo_http = create_no_redirect_client(&config.http, config.skip_tls_verify)?;
        Ok(Self {
            config,
            http,
            demo_http,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source used to stamp and check tokens
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Client configuration
    #[must_use]
    pub const fn config(&self) -> &WithingsConfig {
        &self.config
    }

    /// Time source shared with sessions created from this client
    #[must_use]
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub(super) const fn demo_http(&self) -> &reqwest::Client {
        &self.demo_http
    }

    /// Start an auto-refreshing session for `token`
    #[must_use]
    pub fn authorized_session(self: &Arc<Self>, token: AccessToken) -> AuthorizedSession {
        AuthorizedSession::new(Arc::clone(self), token)
    }

    /// Build the URL a user visits to grant access for `scopes`
    ///
    /// An empty `state` is replaced by 32 random bytes, URL-safe base64 encoded.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the random source fails
    pub fn authorization_url<S: AsRef<str>>(
        &self,
        scopes: &[S],
        state: &str,
    ) -> AppResult<AuthorizationRequest> {
        let state = if state.is_empty() {
            generate_state()?
        } else {
            state.to_owned()
        };
        let scope = scopes
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(oauth::SCOPE_SEPARATOR);

        let mut url = self.config.endpoints.authorize_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.config.client_id)
                .append_pair("state", &state)
                .append_pair("scope", &scope)
                .append_pair("redirect_uri", self.config.redirect_uri.as_str());
            if self.config.demo_mode {
                query.append_pair("mode", oauth::DEMO_MODE);
            }
        }

        Ok(AuthorizationRequest { url, state })
    }

    /// Exchange an authorization code for the user's first token
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` when Withings rejects the code, or a
    /// network/decoding error
    pub async fn exchange_code(&self, code: &str) -> AppResult<AccessToken> {
        let params = [
            ("action", actions::REQUEST_TOKEN),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", oauth::GRANT_AUTHORIZATION_CODE),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        self.request_token(&params, Grant::AuthorizationCode).await
    }

    /// Exchange `token`'s refresh credential for a new token pair
    ///
    /// # Errors
    ///
    /// Returns `TokenRefreshFailed` when Withings rejects the refresh token, or
    /// a network/decoding error
    pub async fn refresh_access_token(&self, token: &AccessToken) -> AppResult<AccessToken> {
        let params = [
            ("action", actions::REQUEST_TOKEN),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", oauth::GRANT_REFRESH_TOKEN),
            ("refresh_token", token.refresh_token.as_str()),
        ];
        self.request_token(&params, Grant::RefreshToken).await
    }

    async fn request_token(&self, params: &[(&str, &str)], grant: Grant) -> AppResult<AccessToken> {
        let url = self
            .config
            .endpoints
            .api_url(endpoints::OAUTH2_TOKEN)
            .map_err(|e| ProviderError::RequestBuild(e.to_string()))?;
        debug!("Requesting Withings token ({grant:?}) from {url}");

        let response = self
            .http
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(transport_error)?;
        let envelope = Self::read_envelope(response).await?;

        if !envelope.is_ok() {
            let message = envelope.error_message();
            warn!(
                "Withings token request rejected - status: {}, error: {message}",
                envelope.status
            );
            let reason = if message.is_empty() {
                format!("status {}", envelope.status)
            } else {
                format!("status {}: {message}", envelope.status)
            };
            return Err(grant.rejected(reason).into());
        }

        let grant_body: TokenGrant = envelope.into_body()?;
        Ok(AccessToken::from_grant(grant_body, self.clock.now())?)
    }

    /// Execute a data request with `token`
    ///
    /// # Errors
    ///
    /// Returns the provider error matching a non-zero Withings status, an
    /// `ApiError` for a non-200 HTTP status, or a network/decoding error
    pub async fn execute<R: WithingsRequest>(
        &self,
        token: &AccessToken,
        request: &R,
    ) -> AppResult<R::Response> {
        let url = self
            .config
            .endpoints
            .api_url(R::PATH)
            .map_err(|e| ProviderError::RequestBuild(e.to_string()))?;
        debug!("Starting Withings API request: {} {}", R::PATH, R::ACTION);

        let response = self
            .http
            .post(url)
            .bearer_auth(&token.access_token)
            .query(&request.query())
            .send()
            .await
            .map_err(transport_error)?;
        let envelope = Self::read_envelope(response).await?;

        if !envelope.is_ok() {
            warn!(
                "Withings API request failed - action: {}, status: {}",
                R::ACTION,
                envelope.status
            );
        }
        Ok(envelope.into_body()?)
    }

    async fn read_envelope(response: Response) -> AppResult<ApiEnvelope> {
        let status = response.status();
        debug!("Withings API response status: {status}");
        let bytes = response.bytes().await.map_err(transport_error)?;

        if status != StatusCode::OK {
            return Err(Self::handle_http_error(status, &bytes).into());
        }
        Ok(ApiEnvelope::parse(&bytes)?)
    }

    fn handle_http_error(status: StatusCode, body: &[u8]) -> ProviderError {
        warn!(
            "Withings HTTP request failed - status: {status}, body_length: {} bytes",
            body.len()
        );
        ProviderError::ApiError {
            provider: PROVIDER_NAME.to_owned(),
            status: i64::from(status.as_u16()),
            message: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

#[async_trait]
impl TokenRefresher for WithingsClient {
    async fn refresh(&self, token: &AccessToken) -> AppResult<AccessToken> {
        self.refresh_access_token(token).await
    }
}

impl fmt::Debug for WithingsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithingsClient")
            .field("client_id", &self.config.client_id)
            .field("secret_fingerprint", &self.config.secret_fingerprint())
            .field("demo_mode", &self.config.demo_mode)
            .finish_non_exhaustive()
    }
}

pub(super) fn transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_builder() {
        ProviderError::RequestBuild(error.to_string())
    } else {
        ProviderError::NetworkError(error.to_string())
    }
}

fn generate_state() -> AppResult<String> {
    let mut bytes = [0_u8; oauth::STATE_BYTES];
    rand::thread_rng()
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::internal(format!("Failed to generate state value: {e}")))?;
    Ok(URL_SAFE.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_state_is_url_safe_and_padded() {
        let state = generate_state().unwrap();
        // 32 bytes encode to 44 characters including one padding character
        assert_eq!(state.len(), 44);
        assert!(state.ends_with('='));
        assert!(!state.contains('+') && !state.contains('/'));
        assert_ne!(state, generate_state().unwrap());
    }

    #[test]
    fn test_grant_rejection_variants() {
        assert!(matches!(
            Grant::RefreshToken.rejected("status 503".to_owned()),
            ProviderError::TokenRefreshFailed { .. }
        ));
        assert!(matches!(
            Grant::AuthorizationCode.rejected("status 503".to_owned()),
            ProviderError::AuthenticationFailed { .. }
        ));
    }
}
