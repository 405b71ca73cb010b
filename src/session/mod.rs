// ABOUTME: Authorized session giving one user's token transparent auto-refresh
// ABOUTME: Exposes one method per Withings resource, all routed through the token guard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authorized sessions
//!
//! An [`AuthorizedSession`] owns exactly one current [`AccessToken`] for a user.
//! Each resource call first asks the [`TokenGuard`] for a fresh token (refreshing
//! it at most once, even with concurrent callers), then performs the data call
//! with that token. Every call returns an [`Authorized`] carrying the data result
//! and, when a refresh happened, the replacement token the caller should persist.
//!
//! ```rust,no_run
//! # async fn demo(client: std::sync::Arc<pierre_withings::WithingsClient>, token: pierre_withings::AccessToken) {
//! use pierre_withings::api::GetDevicesParams;
//!
//! let session = pierre_withings::AuthorizedSession::new(client, token);
//! let (devices, refreshed) = session.get_devices(&GetDevicesParams).await.into_parts();
//! if let Some(token) = refreshed {
//!     // store `token`; the old refresh token is no longer valid
//! #   drop(token);
//! }
//! # drop(devices);
//! # }
//! ```

/// Injectable time source
pub mod clock;
/// Authorize-then-call dispatcher
pub mod dispatcher;
/// Token store and refresh guard
pub mod guard;

pub use clock::{Clock, SystemClock};
pub use dispatcher::Authorized;
pub use guard::{TokenGuard, TokenRefresher};

use crate::api::{
    GetActivityBody, GetActivityParams, GetDevicesBody, GetDevicesParams, GetHeartListBody,
    GetHeartListParams, GetHeartSignalBody, GetHeartSignalParams, GetIntradayActivityBody,
    GetIntradayActivityParams, GetMeasureBody, GetMeasureParams, GetSleepBody, GetSleepParams,
    GetSleepSummaryBody, GetSleepSummaryParams, GetWorkoutBody, GetWorkoutParams,
    ListNotificationsBody, ListNotificationsParams, WithingsRequest,
};
use crate::oauth2_client::{AccessToken, WithingsClient};
use std::sync::Arc;

/// A user's data-access session with automatic token refresh
#[derive(Debug)]
pub struct AuthorizedSession {
    client: Arc<WithingsClient>,
    guard: TokenGuard,
}

impl AuthorizedSession {
    /// Start a session; the client refreshes tokens and supplies the clock
    #[must_use]
    pub fn new(client: Arc<WithingsClient>, token: AccessToken) -> Self {
        let clock = client.clock();
        let refresher: Arc<dyn TokenRefresher> = client.clone();
        Self::with_refresher(client, token, refresher, clock)
    }

    /// Start a session with a custom refresher and clock
    #[must_use]
    pub fn with_refresher(
        client: Arc<WithingsClient>,
        token: AccessToken,
        refresher: Arc<dyn TokenRefresher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            guard: TokenGuard::new(token, refresher, clock),
        }
    }

    /// The token the next call will start from
    pub async fn current_token(&self) -> AccessToken {
        self.guard.current().await
    }

    /// The underlying token guard
    #[must_use]
    pub const fn guard(&self) -> &TokenGuard {
        &self.guard
    }

    /// Execute any Withings request with a fresh token
    pub async fn fetch<R: WithingsRequest>(&self, request: &R) -> Authorized<R::Response> {
        let client = &self.client;
        self.guard
            .dispatch(|token| async move { client.execute(&token, request).await })
            .await
    }

    /// Body measures
    pub async fn get_measures(&self, params: &GetMeasureParams) -> Authorized<GetMeasureBody> {
        self.fetch(params).await
    }

    /// Daily activity
    pub async fn get_activity(&self, params: &GetActivityParams) -> Authorized<GetActivityBody> {
        self.fetch(params).await
    }

    /// High resolution activity
    pub async fn get_intraday_activity(
        &self,
        params: &GetIntradayActivityParams,
    ) -> Authorized<GetIntradayActivityBody> {
        self.fetch(params).await
    }

    /// Workouts
    pub async fn get_workouts(&self, params: &GetWorkoutParams) -> Authorized<GetWorkoutBody> {
        self.fetch(params).await
    }

    /// Heart recordings
    pub async fn get_heart_list(
        &self,
        params: &GetHeartListParams,
    ) -> Authorized<GetHeartListBody> {
        self.fetch(params).await
    }

    /// Raw ECG signal
    pub async fn get_heart_signal(
        &self,
        params: &GetHeartSignalParams,
    ) -> Authorized<GetHeartSignalBody> {
        self.fetch(params).await
    }

    /// Sleep high frequency data
    pub async fn get_sleep(&self, params: &GetSleepParams) -> Authorized<GetSleepBody> {
        self.fetch(params).await
    }

    /// Sleep summaries
    pub async fn get_sleep_summary(
        &self,
        params: &GetSleepSummaryParams,
    ) -> Authorized<GetSleepSummaryBody> {
        self.fetch(params).await
    }

    /// Linked devices
    pub async fn get_devices(&self, params: &GetDevicesParams) -> Authorized<GetDevicesBody> {
        self.fetch(params).await
    }

    /// Notification subscriptions
    pub async fn list_notifications(
        &self,
        params: &ListNotificationsParams,
    ) -> Authorized<ListNotificationsBody> {
        self.fetch(params).await
    }
}
