// ABOUTME: Withings client configuration loaded from the environment or built in code
// ABOUTME: Holds OAuth credentials, redirect URL, demo mode, TLS and timeout settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{endpoints, http};
use crate::errors::{AppError, AppResult};
use sha2::{Digest, Sha256};
use std::env;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Environment variable holding the OAuth client ID
pub const ENV_CLIENT_ID: &str = "WITHINGS_CLIENT_ID";
/// Environment variable holding the OAuth client secret
pub const ENV_CLIENT_SECRET: &str = "WITHINGS_CLIENT_SECRET";
/// Environment variable holding the registered callback URL
pub const ENV_REDIRECT_URI: &str = "WITHINGS_REDIRECT_URI";
/// Environment variable enabling the demo account
pub const ENV_DEMO_MODE: &str = "WITHINGS_DEMO_MODE";
/// Environment variable disabling certificate verification
pub const ENV_SKIP_TLS_VERIFY: &str = "WITHINGS_SKIP_TLS_VERIFY";
/// Environment variable overriding the request timeout (seconds)
pub const ENV_HTTP_TIMEOUT_SECS: &str = "WITHINGS_HTTP_TIMEOUT_SECS";
/// Environment variable overriding the connect timeout (seconds)
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "WITHINGS_CONNECT_TIMEOUT_SECS";
/// Environment variable overriding the API base URL
pub const ENV_API_BASE_URL: &str = "WITHINGS_API_BASE_URL";
/// Environment variable overriding the authorization page URL
pub const ENV_AUTHORIZE_URL: &str = "WITHINGS_AUTHORIZE_URL";

/// HTTP transport settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(http::DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(http::DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// Base URLs of the Withings services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithingsEndpoints {
    /// Base of the data and token APIs (paths are appended)
    pub api_base_url: Url,
    /// User-facing authorization page
    pub authorize_url: Url,
}

impl WithingsEndpoints {
    /// Build endpoints from two URL strings
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if either URL cannot be parsed
    pub fn parse(api_base_url: &str, authorize_url: &str) -> AppResult<Self> {
        Ok(Self {
            api_base_url: parse_url(ENV_API_BASE_URL, api_base_url)?,
            authorize_url: parse_url(ENV_AUTHORIZE_URL, authorize_url)?,
        })
    }

    /// Resolve an API path such as `/v2/measure` against the base URL
    ///
    /// # Errors
    ///
    /// Returns the parse error if the joined URL is malformed
    pub fn api_url(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.api_base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
    }
}

impl Default for WithingsEndpoints {
    fn default() -> Self {
        // Both constants are valid absolute URLs
        Self::parse(
            endpoints::DEFAULT_API_BASE_URL,
            endpoints::DEFAULT_AUTHORIZE_URL,
        )
        .unwrap_or_else(|_| unreachable!("default Withings endpoints are valid URLs"))
    }
}

/// Complete configuration of a Withings client
#[derive(Debug, Clone)]
pub struct WithingsConfig {
    /// OAuth client ID issued at application registration
    pub client_id: String,
    /// OAuth client secret paired with the client ID
    pub client_secret: String,
    /// Callback URL registered with the application
    pub redirect_uri: Url,
    /// Use the Withings demo account
    pub demo_mode: bool,
    /// Accept invalid TLS certificates
    pub skip_tls_verify: bool,
    /// Transport timeouts
    pub http: HttpClientConfig,
    /// Service URLs
    pub endpoints: WithingsEndpoints,
}

impl WithingsConfig {
    /// Create a configuration with default endpoints and timeouts
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: Url,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri,
            demo_mode: false,
            skip_tls_verify: false,
            http: HttpClientConfig::default(),
            endpoints: WithingsEndpoints::default(),
        }
    }

    /// Request the demo account in authorization URLs
    #[must_use]
    pub const fn with_demo_mode(mut self, enabled: bool) -> Self {
        self.demo_mode = enabled;
        self
    }

    /// Skip TLS certificate verification
    #[must_use]
    pub const fn with_skip_tls_verify(mut self, enabled: bool) -> Self {
        self.skip_tls_verify = enabled;
        self
    }

    /// Override the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = timeout;
        self
    }

    /// Override the service URLs (used to target a mock server)
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: WithingsEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Load configuration from `WITHINGS_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when a required variable is unset and
    /// `ConfigInvalid` when a value cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        let client_id = required_var(ENV_CLIENT_ID)?;
        let client_secret = required_var(ENV_CLIENT_SECRET)?;
        let redirect_uri = parse_url(ENV_REDIRECT_URI, &required_var(ENV_REDIRECT_URI)?)?;

        let endpoints = WithingsEndpoints::parse(
            &env::var(ENV_API_BASE_URL)
                .unwrap_or_else(|_| endpoints::DEFAULT_API_BASE_URL.to_owned()),
            &env::var(ENV_AUTHORIZE_URL)
                .unwrap_or_else(|_| endpoints::DEFAULT_AUTHORIZE_URL.to_owned()),
        )?;

        let defaults = HttpClientConfig::default();
        let http = HttpClientConfig {
            timeout: duration_var(ENV_HTTP_TIMEOUT_SECS)?.unwrap_or(defaults.timeout),
            connect_timeout: duration_var(ENV_CONNECT_TIMEOUT_SECS)?
                .unwrap_or(defaults.connect_timeout),
        };

        let config = Self {
            client_id,
            client_secret,
            redirect_uri,
            demo_mode: flag_var(ENV_DEMO_MODE),
            skip_tls_verify: flag_var(ENV_SKIP_TLS_VERIFY),
            http,
            endpoints,
        };
        config.log_diagnostics();
        Ok(config)
    }

    /// Compute SHA256 fingerprint of the client secret (first 8 hex chars)
    ///
    /// This allows comparing secrets without logging actual values
    #[must_use]
    pub fn secret_fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.client_secret.as_bytes());
        let result = hasher.finalize();
        format!("{result:x}").chars().take(8).collect()
    }

    fn log_diagnostics(&self) {
        info!(
            "Withings client configured: client_id={}, secret_fingerprint={}, demo_mode={}, api_base={}",
            self.client_id,
            self.secret_fingerprint(),
            self.demo_mode,
            self.endpoints.api_base_url
        );
        if self.skip_tls_verify {
            warn!("TLS certificate verification is disabled for Withings requests");
        }
    }
}

fn required_var(key: &str) -> AppResult<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config_missing(key)),
    }
}

fn flag_var(key: &str) -> bool {
    env::var(key).is_ok_and(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
}

fn duration_var(key: &str) -> AppResult<Option<Duration>> {
    env::var(key).ok().map_or(Ok(None), |raw| {
        raw.trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|e| AppError::config_invalid(key, e))
    })
}

fn parse_url(key: &str, raw: &str) -> AppResult<Url> {
    Url::parse(raw).map_err(|e| AppError::config_invalid(key, e))
}
