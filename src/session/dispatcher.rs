// ABOUTME: Authorize-then-call dispatcher shared by every resource operation
// ABOUTME: Refreshes the token if needed, runs the operation once, reports any token change
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::guard::TokenGuard;
use crate::errors::AppResult;
use crate::oauth2_client::AccessToken;
use std::future::Future;

/// Outcome of an authorized call
///
/// `refreshed_token` is reported even when `result` is an error: the refresh
/// already happened and the caller must persist the new token either way.
#[derive(Debug)]
#[must_use]
pub struct Authorized<T> {
    /// Result of the wrapped operation, or the refresh error
    pub result: AppResult<T>,
    /// Replacement token obtained before the operation ran
    pub refreshed_token: Option<AccessToken>,
}

impl<T> Authorized<T> {
    /// Split into the operation result and the token change
    pub fn into_parts(self) -> (AppResult<T>, Option<AccessToken>) {
        (self.result, self.refreshed_token)
    }

    /// Transform a successful result, keeping the token change
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Authorized<U> {
        Authorized {
            result: self.result.map(f),
            refreshed_token: self.refreshed_token,
        }
    }
}

impl TokenGuard {
    /// Run `operation` with a fresh token
    ///
    /// At most one refresh call and exactly one operation call are made. If the
    /// refresh fails the operation is not invoked. Operation failures are
    /// returned as-is, without retry.
    pub async fn dispatch<T, F, Fut>(&self, operation: F) -> Authorized<T>
    where
        F: FnOnce(AccessToken) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let (token, refreshed_token) = match self.checkout().await {
            Ok(checked_out) => checked_out,
            Err(error) => {
                return Authorized {
                    result: Err(error),
                    refreshed_token: None,
                }
            }
        };

        Authorized {
            result: operation(token).await,
            refreshed_token,
        }
    }
}
