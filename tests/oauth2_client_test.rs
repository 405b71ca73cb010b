// ABOUTME: OAuth2 client tests for authorization URLs, code exchange, refresh and the demo flow
// ABOUTME: Runs the client against a mock Withings server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Duration;
use common::{
    error_envelope, mock_client, mock_config, reference_time, token, token_body, ManualClock,
};
use pierre_withings::{errors::ProviderError, WithingsClient};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn query_of(url: &url::Url) -> HashMap<String, String> {
    url.query_pairs().into_owned().collect()
}

// ============================================================================
// Authorization URL
// ============================================================================

#[tokio::test]
async fn test_authorization_url_carries_oauth_parameters() {
    let server = MockServer::start().await;
    let client = mock_client(&server, ManualClock::at(reference_time()));

    let request = client
        .authorization_url(&["user.metrics", "user.activity"], "fixed-state")
        .unwrap();
    let query = query_of(&request.url);

    assert_eq!(request.url.path(), "/oauth2_user/authorize2");
    assert_eq!(request.state, "fixed-state");
    assert_eq!(query["response_type"], "code");
    assert_eq!(query["client_id"], "test-client-id");
    assert_eq!(query["state"], "fixed-state");
    assert_eq!(query["scope"], "user.metrics,user.activity");
    assert_eq!(query["redirect_uri"], "https://app.test/callback");
    assert!(!query.contains_key("mode"));
}

#[tokio::test]
async fn test_empty_state_is_generated() {
    let server = MockServer::start().await;
    let client = mock_client(&server, ManualClock::at(reference_time()));

    let first = client.authorization_url(&["user.info"], "").unwrap();
    let second = client.authorization_url(&["user.info"], "").unwrap();

    assert!(!first.state.is_empty());
    assert_ne!(first.state, second.state);
    assert_eq!(query_of(&first.url)["state"], first.state);
}

#[tokio::test]
async fn test_demo_mode_adds_mode_parameter() {
    let server = MockServer::start().await;
    let client =
        WithingsClient::new(mock_config(&server).with_demo_mode(true)).unwrap();

    let request = client.authorization_url(&["user.metrics"], "s").unwrap();

    assert_eq!(query_of(&request.url)["mode"], "demo");
}

// ============================================================================
// Token endpoint
// ============================================================================

#[tokio::test]
async fn test_exchange_code_builds_token_from_grant() {
    let server = MockServer::start().await;
    let now = reference_time();
    let client = mock_client(&server, ManualClock::at(now));

    Mock::given(method("POST"))
        .and(path("/v2/oauth2"))
        .and(body_string_contains("action=requesttoken"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code"))
        .and(body_string_contains("client_secret=test-client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("A1", "R1", 10_800)))
        .expect(1)
        .mount(&server)
        .await;

    let token = client.exchange_code("auth-code").await.unwrap();

    assert_eq!(token.user_id, "12345");
    assert_eq!(token.access_token, "A1");
    assert_eq!(token.refresh_token, "R1");
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.issued_at, now);
    assert_eq!(token.expires_at, now + Duration::seconds(10_800));
}

#[tokio::test]
async fn test_rejected_code_is_authentication_failure() {
    let server = MockServer::start().await;
    let client = mock_client(&server, ManualClock::at(reference_time()));

    Mock::given(method("POST"))
        .and(path("/v2/oauth2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(error_envelope(503, "Invalid Params")),
        )
        .mount(&server)
        .await;

    let error = client.exchange_code("stale-code").await.unwrap_err();

    match error.provider_error() {
        Some(ProviderError::AuthenticationFailed { reason, .. }) => {
            assert!(reason.contains("503"));
            assert!(reason.contains("Invalid Params"));
        }
        other => panic!("expected authentication failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_refresh_sends_refresh_token() {
    let server = MockServer::start().await;
    let now = reference_time();
    let client = mock_client(&server, ManualClock::at(now));

    Mock::given(method("POST"))
        .and(path("/v2/oauth2"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=R1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("A2", "R2", 10_800)))
        .expect(1)
        .mount(&server)
        .await;

    let refreshed = client
        .refresh_access_token(&token("A1", "R1", now))
        .await
        .unwrap();

    assert_eq!(refreshed.access_token, "A2");
    assert_eq!(refreshed.refresh_token, "R2");
    assert_eq!(refreshed.expires_at, now + Duration::seconds(10_800));
}

#[tokio::test]
async fn test_rejected_refresh_is_refresh_failure() {
    let server = MockServer::start().await;
    let now = reference_time();
    let client = mock_client(&server, ManualClock::at(now));

    Mock::given(method("POST"))
        .and(path("/v2/oauth2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_envelope(401, "")))
        .mount(&server)
        .await;

    let error = client
        .refresh_access_token(&token("A1", "R1", now))
        .await
        .unwrap_err();

    assert!(matches!(
        error.provider_error(),
        Some(ProviderError::TokenRefreshFailed { .. })
    ));
}

#[tokio::test]
async fn test_out_of_range_lifetime_is_invalid_response() {
    let server = MockServer::start().await;
    let client = mock_client(&server, ManualClock::at(reference_time()));

    Mock::given(method("POST"))
        .and(path("/v2/oauth2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_body("A1", "R1", i64::MAX)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let error = client.exchange_code("code").await.unwrap_err();

    assert!(matches!(
        error.provider_error(),
        Some(ProviderError::InvalidResponse { .. })
    ));
}

#[tokio::test]
async fn test_token_endpoint_http_error() {
    let server = MockServer::start().await;
    let client = mock_client(&server, ManualClock::at(reference_time()));

    Mock::given(method("POST"))
        .and(path("/v2/oauth2"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let error = client.exchange_code("code").await.unwrap_err();

    assert!(matches!(
        error.provider_error(),
        Some(ProviderError::ApiError { status: 502, .. })
    ));
}

// ============================================================================
// Demo account flow
// ============================================================================

#[tokio::test]
async fn test_demo_access_token_follows_consent_redirect() {
    let server = MockServer::start().await;
    let now = reference_time();
    let client = Arc::new(
        WithingsClient::new(mock_config(&server).with_demo_mode(true))
            .unwrap()
            .with_clock(ManualClock::at(now)),
    );

    Mock::given(method("GET"))
        .and(path("/oauth2_user/authorize2"))
        .and(query_param("mode", "demo"))
        .and(query_param("scope", "user.metrics,user.activity"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><form method="post"><input type="hidden" name="csrf_token" value="csrf-123"/></form></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth2_user/authorize2"))
        .and(body_string_contains("authorized=1"))
        .and(body_string_contains("csrf_token=csrf-123"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "https://app.test/callback?code=demo-code&state=s"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/oauth2"))
        .and(body_string_contains("code=demo-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("DEMO", "DR", 10_800)))
        .expect(1)
        .mount(&server)
        .await;

    let token = client.demo_access_token().await.unwrap();

    assert_eq!(token.access_token, "DEMO");
    assert_eq!(token.refresh_token, "DR");
}

#[tokio::test]
async fn test_demo_flow_without_csrf_token_fails() {
    let server = MockServer::start().await;
    let client = mock_client(&server, ManualClock::at(reference_time()));

    Mock::given(method("GET"))
        .and(path("/oauth2_user/authorize2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let error = client.demo_access_token().await.unwrap_err();

    assert!(matches!(
        error.provider_error(),
        Some(ProviderError::InvalidResponse { .. })
    ));
}

#[tokio::test]
async fn test_grant_with_string_user_id() {
    let server = MockServer::start().await;
    let client = mock_client(&server, ManualClock::at(reference_time()));

    Mock::given(method("POST"))
        .and(path("/v2/oauth2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "body": {
                "userid": "98765",
                "access_token": "A1",
                "refresh_token": "R1",
                "expires_in": 10800,
                "scope": "user.info",
                "csrf_token": "c"
            }
        })))
        .mount(&server)
        .await;

    let token = client.exchange_code("code").await.unwrap();

    assert_eq!(token.user_id, "98765");
    assert_eq!(token.csrf_token.as_deref(), Some("c"));
    assert_eq!(token.token_type, "Bearer");
}
