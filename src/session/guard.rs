// ABOUTME: Token store and refresh guard holding the single current token of a session
// ABOUTME: Serializes check-and-refresh under one async mutex so only one refresh runs at a time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::clock::Clock;
use crate::errors::AppResult;
use crate::oauth2_client::AccessToken;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Exchanges a token's refresh credential for a new token pair
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Obtain the token that replaces `token`
    async fn refresh(&self, token: &AccessToken) -> AppResult<AccessToken>;
}

/// Owns the current token of a session and refreshes it when it nears expiry
///
/// The lock is held across the whole check-and-refresh sequence, including the
/// refresh network call. Concurrent callers wait for an in-flight refresh and
/// then observe its result instead of refreshing again.
pub struct TokenGuard {
    token: Mutex<AccessToken>,
    refresher: Arc<dyn TokenRefresher>,
    clock: Arc<dyn Clock>,
}

impl TokenGuard {
    /// Create a guard around an initial token
    #[must_use]
    pub fn new(token: AccessToken, refresher: Arc<dyn TokenRefresher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            token: Mutex::new(token),
            refresher,
            clock,
        }
    }

    /// Snapshot of the current token
    pub async fn current(&self) -> AccessToken {
        self.token.lock().await.clone()
    }

    /// Refresh the stored token if it is within the skew margin of its expiry
    ///
    /// Returns the new token when a refresh happened, `None` when the stored
    /// token is still usable.
    ///
    /// # Errors
    ///
    /// Returns the refresher's error; the stored token is left unchanged
    pub async fn ensure_fresh(&self) -> AppResult<Option<AccessToken>> {
        self.checkout().await.map(|(_, refreshed)| refreshed)
    }

    /// Token to use for the next call, plus the replacement token if one was obtained
    pub(super) async fn checkout(&self) -> AppResult<(AccessToken, Option<AccessToken>)> {
        let mut slot = self.token.lock().await;
        if !slot.needs_refresh(self.clock.now()) {
            return Ok((slot.clone(), None));
        }

        let refreshed = self.refresher.refresh(&slot).await?;
        *slot = refreshed.clone();
        Ok((refreshed.clone(), Some(refreshed)))
    }
}

impl fmt::Debug for TokenGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGuard").finish_non_exhaustive()
    }
}
