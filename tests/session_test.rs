// ABOUTME: Token guard and authorized session tests for the refresh lifecycle
// ABOUTME: Covers expiry skew, single refresh, failure isolation and concurrent callers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Duration;
use common::{
    mock_client, ok_envelope, reference_time, token, token_body, CountingRefresher, ManualClock,
};
use pierre_withings::{
    api::GetDevicesParams,
    errors::{AppError, ProviderError},
    AccessToken, AuthorizedSession, TokenGuard,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Dispatch an operation that records the access token it was given
async fn dispatch_recording(
    guard: &TokenGuard,
    seen: &Mutex<Vec<String>>,
) -> (Result<(), AppError>, Option<AccessToken>) {
    guard
        .dispatch(|token| async move {
            seen.lock().unwrap().push(token.access_token);
            Ok(())
        })
        .await
        .into_parts()
}

// ============================================================================
// Refresh decision
// ============================================================================

#[tokio::test]
async fn test_expired_token_refreshes_exactly_once() {
    let now = reference_time();
    let clock = ManualClock::at(now);
    let fresh = token("A2", "R2", now + Duration::hours(1));
    let refresher = CountingRefresher::returning(fresh.clone());
    let guard = TokenGuard::new(
        token("A1", "R1", now - Duration::minutes(5)),
        refresher.clone(),
        clock,
    );
    let seen = Mutex::new(Vec::new());

    let (result, refreshed) = dispatch_recording(&guard, &seen).await;

    assert!(result.is_ok());
    assert_eq!(refresher.calls(), 1);
    assert_eq!(refreshed, Some(fresh.clone()));
    assert_eq!(*seen.lock().unwrap(), vec!["A2".to_owned()]);
    assert_eq!(guard.current().await, fresh);
}

#[tokio::test]
async fn test_fresh_token_is_not_refreshed() {
    let now = reference_time();
    let refresher = CountingRefresher::returning(token("A2", "R2", now + Duration::hours(2)));
    let guard = TokenGuard::new(
        token("A1", "R1", now + Duration::hours(1)),
        refresher.clone(),
        ManualClock::at(now),
    );
    let seen = Mutex::new(Vec::new());

    let (result, refreshed) = dispatch_recording(&guard, &seen).await;

    assert!(result.is_ok());
    assert_eq!(refresher.calls(), 0);
    assert!(refreshed.is_none());
    assert_eq!(*seen.lock().unwrap(), vec!["A1".to_owned()]);
}

#[tokio::test]
async fn test_refresh_within_skew_margin() {
    let now = reference_time();
    let replacement = token("A2", "R2", now + Duration::hours(1));

    let refresher = CountingRefresher::returning(replacement.clone());
    let guard = TokenGuard::new(
        token("A1", "R1", now + Duration::seconds(5)),
        refresher.clone(),
        ManualClock::at(now),
    );
    assert_eq!(guard.ensure_fresh().await.unwrap(), Some(replacement.clone()));
    assert_eq!(refresher.calls(), 1);

    let refresher = CountingRefresher::returning(replacement.clone());
    let guard = TokenGuard::new(
        token("A1", "R1", now + Duration::seconds(15)),
        refresher.clone(),
        ManualClock::at(now),
    );
    assert_eq!(guard.ensure_fresh().await.unwrap(), None);
    assert_eq!(refresher.calls(), 0);
}

#[tokio::test]
async fn test_refresh_at_exact_skew_boundary() {
    let now = reference_time();
    let refresher = CountingRefresher::returning(token("A2", "R2", now + Duration::hours(1)));
    let guard = TokenGuard::new(
        token("A1", "R1", now + Duration::seconds(10)),
        refresher.clone(),
        ManualClock::at(now),
    );

    assert!(guard.ensure_fresh().await.unwrap().is_some());
    assert_eq!(refresher.calls(), 1);
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_refresh_failure_leaves_token_untouched() {
    let now = reference_time();
    let original = token("A1", "R1", now - Duration::seconds(1));
    let refresher = CountingRefresher::failing();
    let guard = TokenGuard::new(original.clone(), refresher.clone(), ManualClock::at(now));
    let operation_calls = AtomicUsize::new(0);

    let outcome = guard
        .dispatch(|_token| {
            operation_calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
        .await;

    assert_eq!(refresher.calls(), 1);
    assert_eq!(operation_calls.load(Ordering::SeqCst), 0);
    assert!(outcome.refreshed_token.is_none());
    let error = outcome.result.unwrap_err();
    assert!(matches!(
        error.provider_error(),
        Some(ProviderError::TokenRefreshFailed { .. })
    ));
    assert_eq!(guard.current().await, original);
}

#[tokio::test]
async fn test_operation_error_still_reports_refreshed_token() {
    let now = reference_time();
    let fresh = token("A2", "R2", now + Duration::hours(1));
    let guard = TokenGuard::new(
        token("A1", "R1", now - Duration::seconds(1)),
        CountingRefresher::returning(fresh.clone()),
        ManualClock::at(now),
    );

    let outcome = guard
        .dispatch(|_token| async { Err::<(), _>(AppError::internal("fetch failed")) })
        .await;

    assert!(outcome.result.is_err());
    assert_eq!(outcome.refreshed_token, Some(fresh.clone()));
    assert_eq!(guard.current().await, fresh);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_callers_share_one_refresh() {
    let now = reference_time();
    let fresh = token("A2", "R2", now + Duration::hours(1));
    let refresher =
        CountingRefresher::slow(fresh.clone(), std::time::Duration::from_millis(50));
    let guard = TokenGuard::new(
        token("A1", "R1", now - Duration::seconds(30)),
        refresher.clone(),
        ManualClock::at(now),
    );
    let seen = Mutex::new(Vec::new());

    let ((first, first_refreshed), (second, second_refreshed)) = tokio::join!(
        dispatch_recording(&guard, &seen),
        dispatch_recording(&guard, &seen)
    );

    assert!(first.is_ok() && second.is_ok());
    assert_eq!(refresher.calls(), 1);
    let reported = [first_refreshed, second_refreshed]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    assert_eq!(reported, vec![fresh]);
    assert_eq!(*seen.lock().unwrap(), vec!["A2".to_owned(), "A2".to_owned()]);
}

// ============================================================================
// End-to-end session against a mock Withings server
// ============================================================================

#[tokio::test]
async fn test_session_refreshes_as_expiry_approaches() {
    let server = MockServer::start().await;
    let expiry = reference_time();
    let clock = ManualClock::at(expiry - Duration::seconds(20));
    let client = mock_client(&server, clock.clone());

    Mock::given(method("POST"))
        .and(path("/v2/oauth2"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=R1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("A2", "R2", 3605)))
        .expect(1)
        .mount(&server)
        .await;
    for access in ["A1", "A2"] {
        Mock::given(method("POST"))
            .and(path("/v2/user"))
            .and(query_param("action", "getdevice"))
            .and(header("authorization", format!("Bearer {access}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
                "devices": [{
                    "type": "Scale",
                    "model": "Body+",
                    "model_id": 6,
                    "battery": "high",
                    "deviceid": format!("device-for-{access}"),
                    "timezone": "Europe/Paris"
                }]
            }))))
            .mount(&server)
            .await;
    }

    let session = client.authorized_session(token("A1", "R1", expiry));

    let (devices, refreshed) = session.get_devices(&GetDevicesParams).await.into_parts();
    assert_eq!(devices.unwrap().devices[0].device_id, "device-for-A1");
    assert!(refreshed.is_none());

    clock.advance(Duration::seconds(15));
    let (devices, refreshed) = session.get_devices(&GetDevicesParams).await.into_parts();
    assert_eq!(devices.unwrap().devices[0].device_id, "device-for-A2");
    let refreshed = refreshed.expect("token should have been refreshed");
    assert_eq!(refreshed.access_token, "A2");
    assert_eq!(refreshed.refresh_token, "R2");
    assert_eq!(refreshed.expires_at, expiry + Duration::seconds(3600));
    assert_eq!(session.current_token().await, refreshed);

    clock.advance(Duration::minutes(30));
    let (devices, refreshed) = session.get_devices(&GetDevicesParams).await.into_parts();
    assert_eq!(devices.unwrap().devices[0].device_id, "device-for-A2");
    assert!(refreshed.is_none());
}

#[tokio::test]
async fn test_session_with_injected_refresher_skips_fetch_on_refresh_failure() {
    let server = MockServer::start().await;
    let now = reference_time();
    let clock = ManualClock::at(now);
    let client = mock_client(&server, clock.clone());

    Mock::given(method("POST"))
        .and(path("/v2/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({}))))
        .expect(0)
        .mount(&server)
        .await;

    let original = token("A1", "R1", now - Duration::seconds(1));
    let refresher = CountingRefresher::failing();
    let session = AuthorizedSession::with_refresher(
        Arc::clone(&client),
        original.clone(),
        refresher.clone(),
        clock,
    );

    let outcome = session.get_devices(&GetDevicesParams).await;

    assert!(outcome.result.is_err());
    assert!(outcome.refreshed_token.is_none());
    assert_eq!(refresher.calls(), 1);
    assert_eq!(session.current_token().await, original);
}

#[tokio::test]
async fn test_auth_error_from_data_call_is_not_retried() {
    let server = MockServer::start().await;
    let now = reference_time();
    let clock = ManualClock::at(now);
    let client = mock_client(&server, clock.clone());

    Mock::given(method("POST"))
        .and(path("/v2/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::error_envelope(401, "invalid_token")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/oauth2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("A2", "R2", 10_800)))
        .expect(0)
        .mount(&server)
        .await;

    let session = client.authorized_session(token("A1", "R1", now + Duration::hours(1)));
    let outcome = session.get_devices(&GetDevicesParams).await;

    assert!(outcome.refreshed_token.is_none());
    assert!(matches!(
        outcome.result.unwrap_err().provider_error(),
        Some(ProviderError::AuthenticationFailed { .. })
    ));
}
