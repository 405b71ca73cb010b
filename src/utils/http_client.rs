// ABOUTME: HTTP client factory for Withings API and OAuth calls
// ABOUTME: Applies configured timeouts, optional TLS relaxation and redirect policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::HttpClientConfig;
use crate::constants::oauth::PROVIDER_NAME;
use crate::errors::{AppError, AppResult, ProviderError};
use reqwest::{redirect, Client, ClientBuilder};

fn base_builder(config: &HttpClientConfig, skip_tls_verify: bool) -> ClientBuilder {
    ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .danger_accept_invalid_certs(skip_tls_verify)
        .user_agent(concat!("pierre-withings/", env!("CARGO_PKG_VERSION")))
}

fn build(builder: ClientBuilder) -> AppResult<Client> {
    builder.build().map_err(|e| {
        AppError::from(ProviderError::ConfigurationError {
            provider: PROVIDER_NAME.to_owned(),
            details: format!("failed to build HTTP client: {e}"),
        })
    })
}

/// Create the HTTP client used for token and data calls
///
/// # Errors
///
/// Returns a configuration error if the TLS backend cannot be initialized
pub fn create_api_client(config: &HttpClientConfig, skip_tls_verify: bool) -> AppResult<Client> {
    build(base_builder(config, skip_tls_verify))
}

/// Create an HTTP client that reports redirects instead of following them
///
/// The demo authorization flow reads the authorization code from the
/// `Location` header of the consent form response.
///
/// # Errors
///
/// Returns a configuration error if the TLS backend cannot be initialized
pub fn create_no_redirect_client(
    config: &HttpClientConfig,
    skip_tls_verify: bool,
) -> AppResult<Client> {
    build(base_builder(config, skip_tls_verify).redirect(redirect::Policy::none()))
}
