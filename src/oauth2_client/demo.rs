// ABOUTME: Demo account token acquisition by driving the consent page without a browser
// ABOUTME: Scrapes the CSRF token, submits consent and exchanges the redirected code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::client::{transport_error, WithingsClient};
use super::token::AccessToken;
use crate::constants::oauth::{PROVIDER_NAME, SCOPE_USER_ACTIVITY, SCOPE_USER_METRICS};
use crate::errors::{AppError, AppResult, ProviderError};
use regex::Regex;
use reqwest::{header::LOCATION, Response};
use tracing::debug;
use url::Url;

const CSRF_PATTERN: &str = r#"csrf_token[^>]*?value="([^"]*)""#;

impl WithingsClient {
    /// Obtain a token for the Withings demo user
    ///
    /// Intended for testing against the demo account: requests an authorization
    /// URL for `user.metrics,user.activity`, accepts the consent form and
    /// exchanges the resulting code. Only meaningful with demo mode enabled.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResponse` if the consent page or redirect does not have
    /// the expected shape, or any error from the code exchange
    pub async fn demo_access_token(&self) -> AppResult<AccessToken> {
        let request = self.authorization_url(&[SCOPE_USER_METRICS, SCOPE_USER_ACTIVITY], "")?;

        let page = self
            .demo_http()
            .get(request.url.clone())
            .send()
            .await
            .map_err(transport_error)?;
        let status = page.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                provider: PROVIDER_NAME.to_owned(),
                status: i64::from(status.as_u16()),
                message: "demo authorization page unavailable".to_owned(),
            }
            .into());
        }
        let html = page.text().await.map_err(transport_error)?;
        let csrf_token = extract_csrf_token(&html)?;

        let consent = self
            .demo_http()
            .post(request.url)
            .form(&[("authorized", "1"), ("csrf_token", csrf_token.as_str())])
            .send()
            .await
            .map_err(transport_error)?;
        let code = authorization_code(&consent)?;
        debug!("Obtained Withings demo authorization code");

        self.exchange_code(&code).await
    }
}

/// Pull the hidden `csrf_token` input value out of the consent page
///
/// # Errors
///
/// Returns `InvalidResponse` when the page has no CSRF token
pub fn extract_csrf_token(html: &str) -> AppResult<String> {
    let pattern = Regex::new(CSRF_PATTERN)
        .map_err(|e| AppError::internal(format!("Invalid CSRF pattern: {e}")))?;
    pattern
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().to_owned())
        .ok_or_else(|| invalid_response("failed to find csrf token in authorization page"))
}

/// Read `code` from the consent response: its `Location` header when it is a
/// redirect, otherwise the final URL
fn authorization_code(response: &Response) -> AppResult<String> {
    let target = match response.headers().get(LOCATION) {
        Some(location) if response.status().is_redirection() => {
            let location = location
                .to_str()
                .map_err(|e| invalid_response(format!("unreadable redirect location: {e}")))?;
            response
                .url()
                .join(location)
                .map_err(|e| invalid_response(format!("invalid redirect location: {e}")))?
        }
        _ => response.url().clone(),
    };
    code_from_url(&target)
}

fn code_from_url(url: &Url) -> AppResult<String> {
    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| invalid_response(format!("no authorization code in redirect to {url}")))
}

fn invalid_response(reason: impl Into<String>) -> AppError {
    ProviderError::InvalidResponse {
        provider: PROVIDER_NAME.to_owned(),
        reason: reason.into(),
    }
    .into()
}
