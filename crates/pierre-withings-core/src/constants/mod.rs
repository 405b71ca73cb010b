// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Endpoint paths, API actions, OAuth scopes, token timing and unit factors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Unit conversion factors used by measurement helpers
pub mod units;

/// Withings endpoint URLs and paths
pub mod endpoints {
    /// Default base URL for the Withings data and token APIs
    pub const DEFAULT_API_BASE_URL: &str = "https://wbsapi.withings.net";
    /// Default URL of the user authorization page
    pub const DEFAULT_AUTHORIZE_URL: &str = "https://account.withings.com/oauth2_user/authorize2";

    /// Token endpoint (code exchange and refresh)
    pub const OAUTH2_TOKEN: &str = "/v2/oauth2";
    /// Legacy measure endpoint (`getmeas`)
    pub const MEASURE: &str = "/measure";
    /// Measure v2 endpoint (activity, intraday, workouts)
    pub const MEASURE_V2: &str = "/v2/measure";
    /// Heart v2 endpoint
    pub const HEART_V2: &str = "/v2/heart";
    /// Sleep v2 endpoint
    pub const SLEEP_V2: &str = "/v2/sleep";
    /// User v2 endpoint
    pub const USER_V2: &str = "/v2/user";
    /// Notification endpoint
    pub const NOTIFY: &str = "/notify";
}

/// Values of the `action` parameter understood by the Withings API
pub mod actions {
    /// Token exchange and refresh
    pub const REQUEST_TOKEN: &str = "requesttoken";
    /// Body measures
    pub const GET_MEASURE: &str = "getmeas";
    /// Daily activity aggregates
    pub const GET_ACTIVITY: &str = "getactivity";
    /// High resolution activity
    pub const GET_INTRADAY_ACTIVITY: &str = "getintradayactivity";
    /// Workout summaries
    pub const GET_WORKOUTS: &str = "getworkouts";
    /// Heart recordings (ECG, blood pressure)
    pub const HEART_LIST: &str = "list";
    /// Single heart signal
    pub const HEART_GET: &str = "get";
    /// Sleep high frequency data
    pub const SLEEP_GET: &str = "get";
    /// Sleep summaries
    pub const SLEEP_GET_SUMMARY: &str = "getsummary";
    /// Devices linked to the user
    pub const USER_GET_DEVICE: &str = "getdevice";
    /// Notification subscriptions
    pub const NOTIFY_LIST: &str = "list";
}

/// OAuth scopes and grant values
pub mod oauth {
    /// Provider identifier used in logs and error messages
    pub const PROVIDER_NAME: &str = "withings";
    /// Access to activity, sleep and workout data
    pub const SCOPE_USER_ACTIVITY: &str = "user.activity";
    /// Access to body measures
    pub const SCOPE_USER_METRICS: &str = "user.metrics";
    /// Access to user information (devices)
    pub const SCOPE_USER_INFO: &str = "user.info";
    /// Separator the authorize endpoint expects between scopes
    pub const SCOPE_SEPARATOR: &str = ",";
    /// Authorization code grant
    pub const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";
    /// Refresh token grant
    pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";
    /// Value of the `mode` query parameter enabling the demo account
    pub const DEMO_MODE: &str = "demo";
    /// Number of random bytes behind a generated `state` value
    pub const STATE_BYTES: usize = 32;
}

/// Token lifecycle timing
pub mod token {
    /// Safety margin subtracted from the expiry before comparing with "now"
    pub const EXPIRY_SKEW_SECS: i64 = 10;
}

/// HTTP transport defaults
pub mod http {
    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connection timeout in seconds
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// Provider-reported `status` values
pub mod status {
    /// Successful call
    pub const OK: i64 = 0;
    /// Invalid or expired access token
    pub const INVALID_TOKEN: i64 = 401;
    /// Too many requests
    pub const TOO_MANY_REQUESTS: i64 = 601;
}
