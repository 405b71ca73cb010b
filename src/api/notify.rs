// ABOUTME: Notification subscription list request (list) and its response body
// ABOUTME: Callback URLs registered for the user, optionally filtered by application
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{QueryParams, WithingsRequest};
use crate::constants::{actions, endpoints};
use serde::{Deserialize, Serialize};

/// Parameters of a notification `list` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListNotificationsParams {
    /// Data category (`appli` code) to filter on; all when unset
    pub appli: Option<i64>,
}

impl WithingsRequest for ListNotificationsParams {
    type Response = ListNotificationsBody;
    const PATH: &'static str = endpoints::NOTIFY;
    const ACTION: &'static str = actions::NOTIFY_LIST;

    fn params(&self) -> QueryParams {
        self.appli
            .map(|appli| vec![("appli", appli.to_string())])
            .unwrap_or_default()
    }
}

/// A registered notification callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationProfile {
    /// Data category
    pub appli: i64,
    /// Callback URL
    #[serde(rename = "callbackurl")]
    pub callback_url: String,
    /// Expiry (Unix seconds)
    #[serde(default)]
    pub expires: Option<i64>,
    /// Comment given at subscription
    #[serde(default)]
    pub comment: Option<String>,
}

/// `body` of a notification `list` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListNotificationsBody {
    /// Subscriptions
    #[serde(default)]
    pub profiles: Vec<NotificationProfile>,
}
