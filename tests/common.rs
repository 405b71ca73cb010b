// ABOUTME: Shared test utilities for the Withings client integration tests
// ABOUTME: Provides a manual clock, a counting refresher, token builders and mock server wiring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `pierre_withings`

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pierre_withings::{
    config::{WithingsConfig, WithingsEndpoints},
    errors::{AppResult, ProviderError},
    AccessToken, Clock, TokenRefresher, WithingsClient,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once, PoisonError};
use url::Url;
use wiremock::MockServer;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Fixed reference instant used as `T` in the refresh scenarios
pub fn reference_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

/// Clock the test moves by hand
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Refresher that counts its calls and returns a canned token or failure
#[derive(Debug)]
pub struct CountingRefresher {
    calls: AtomicUsize,
    next: Option<AccessToken>,
    delay: std::time::Duration,
}

impl CountingRefresher {
    pub fn returning(token: AccessToken) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            next: Some(token),
            delay: std::time::Duration::ZERO,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            next: None,
            delay: std::time::Duration::ZERO,
        })
    }

    pub fn slow(token: AccessToken, delay: std::time::Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            next: Some(token),
            delay,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenRefresher for CountingRefresher {
    async fn refresh(&self, _token: &AccessToken) -> AppResult<AccessToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.next.clone().ok_or_else(|| {
            ProviderError::TokenRefreshFailed {
                provider: "withings".to_owned(),
                reason: "status 503: invalid refresh_token".to_owned(),
            }
            .into()
        })
    }
}

/// Token with the given credentials expiring at `expires_at`
pub fn token(access: &str, refresh: &str, expires_at: DateTime<Utc>) -> AccessToken {
    let expires_in = 10_800;
    AccessToken {
        user_id: "12345".to_owned(),
        access_token: access.to_owned(),
        refresh_token: refresh.to_owned(),
        token_type: "Bearer".to_owned(),
        scope: "user.metrics,user.activity".to_owned(),
        csrf_token: None,
        expires_in,
        issued_at: expires_at - Duration::seconds(expires_in),
        expires_at,
    }
}

/// Configuration pointing every Withings URL at `server`
pub fn mock_config(server: &MockServer) -> WithingsConfig {
    let endpoints = WithingsEndpoints::parse(
        &server.uri(),
        &format!("{}/oauth2_user/authorize2", server.uri()),
    )
    .unwrap();
    WithingsConfig::new(
        "test-client-id",
        "test-client-secret",
        Url::parse("https://app.test/callback").unwrap(),
    )
    .with_endpoints(endpoints)
}

/// Client for `server` driven by `clock`
pub fn mock_client(server: &MockServer, clock: Arc<ManualClock>) -> Arc<WithingsClient> {
    init_test_logging();
    Arc::new(
        WithingsClient::new(mock_config(server))
            .unwrap()
            .with_clock(clock),
    )
}

/// Successful Withings envelope around `body`
pub fn ok_envelope(body: Value) -> Value {
    json!({ "status": 0, "body": body })
}

/// Failed Withings envelope
pub fn error_envelope(status: i64, error: &str) -> Value {
    json!({ "status": status, "error": error })
}

/// Token endpoint body as returned by `requesttoken`
pub fn token_body(access: &str, refresh: &str, expires_in: i64) -> Value {
    ok_envelope(json!({
        "userid": 12345,
        "access_token": access,
        "refresh_token": refresh,
        "expires_in": expires_in,
        "scope": "user.metrics,user.activity",
        "token_type": "Bearer"
    }))
}
