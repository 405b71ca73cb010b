// ABOUTME: Withings resource request definitions and response envelope decoding
// ABOUTME: Each request type knows its endpoint path, action and query encoding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Withings resources
//!
//! Every data call is a `POST` to `{api_base}{PATH}` carrying a bearer token and
//! its parameters in the query string. Request types implement
//! [`WithingsRequest`] and are executed by
//! [`WithingsClient::execute`](crate::oauth2_client::WithingsClient::execute)
//! or, with automatic token refresh, through an
//! [`AuthorizedSession`](crate::session::AuthorizedSession).

/// Declare an enum of `data_fields` names understood by an endpoint
macro_rules! data_fields {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every field the endpoint accepts
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Name of the field on the wire
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Daily activity aggregates (`getactivity`)
pub mod activity;
/// Heart recordings (`list`, `get`)
pub mod heart;
/// High resolution activity (`getintradayactivity`)
pub mod intraday;
/// Body measures (`getmeas`)
pub mod measures;
/// Notification subscriptions (`list`)
pub mod notify;
/// Sleep high frequency data (`get`)
pub mod sleep;
/// Sleep summaries (`getsummary`)
pub mod sleep_summary;
/// Devices linked to the user (`getdevice`)
pub mod user;
/// Workout summaries (`getworkouts`)
pub mod workouts;

pub use activity::{Activity, ActivityDataField, GetActivityBody, GetActivityParams};
pub use heart::{
    GetHeartListBody, GetHeartListParams, GetHeartSignalBody, GetHeartSignalParams, HeartSeries,
};
pub use intraday::{GetIntradayActivityBody, GetIntradayActivityParams, IntradayDataField};
pub use measures::{GetMeasureBody, GetMeasureParams, MeasureCategory};
pub use notify::{ListNotificationsBody, ListNotificationsParams, NotificationProfile};
pub use sleep::{GetSleepBody, GetSleepParams, SleepDataField};
pub use sleep_summary::{
    GetSleepSummaryBody, GetSleepSummaryParams, SleepSummary, SleepSummaryDataField,
};
pub use user::{Device, GetDevicesBody, GetDevicesParams};
pub use workouts::{GetWorkoutBody, GetWorkoutParams, Workout, WorkoutDataField};

use crate::constants::{oauth::PROVIDER_NAME, status};
use crate::errors::{ProviderError, ProviderResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Ordered `(name, value)` pairs sent as the query string
pub type QueryParams = Vec<(&'static str, String)>;

/// A typed Withings data request
pub trait WithingsRequest: Send + Sync {
    /// Decoded `body` of a successful response
    type Response: DeserializeOwned + Send;

    /// Endpoint path appended to the API base URL
    const PATH: &'static str;

    /// Value of the `action` parameter
    const ACTION: &'static str;

    /// Parameters other than `action`
    fn params(&self) -> QueryParams;

    /// Full query string pairs, `action` first
    fn query(&self) -> QueryParams {
        let mut query = vec![("action", Self::ACTION.to_owned())];
        query.extend(self.params());
        query
    }
}

/// Response wrapper shared by every Withings endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    /// `0` on success, provider error code otherwise
    pub status: i64,
    /// Error description accompanying a non-zero status
    #[serde(default)]
    pub error: Option<String>,
    /// Endpoint specific payload
    #[serde(default)]
    pub body: Value,
}

impl ApiEnvelope {
    /// Parse the raw response bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidResponse` if the bytes are not a Withings envelope
    pub fn parse(bytes: &[u8]) -> ProviderResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| ProviderError::InvalidResponse {
            provider: PROVIDER_NAME.to_owned(),
            reason: format!("malformed response envelope: {e}"),
        })
    }

    /// Whether the provider reported success
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == status::OK
    }

    /// Provider error message, empty when none was sent
    #[must_use]
    pub fn error_message(&self) -> String {
        self.error.clone().unwrap_or_default()
    }

    /// Decode the body, mapping a non-zero status to the matching provider error
    ///
    /// # Errors
    ///
    /// Returns the classified status error, or `InvalidResponse` if the body
    /// does not match `T`
    pub fn into_body<T: DeserializeOwned>(self) -> ProviderResult<T> {
        if !self.is_ok() {
            return Err(ProviderError::from_status(
                PROVIDER_NAME,
                self.status,
                self.error_message(),
            ));
        }
        serde_json::from_value(self.body).map_err(|e| ProviderError::InvalidResponse {
            provider: PROVIDER_NAME.to_owned(),
            reason: e.to_string(),
        })
    }
}

/// Encode a timestamp as Unix seconds
#[must_use]
pub fn unix_seconds(at: DateTime<Utc>) -> String {
    at.timestamp().to_string()
}

/// Encode a date as `YYYY-MM-DD`
#[must_use]
pub fn ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Join API field names with commas
pub fn join_fields<F: AsRef<str>>(fields: &[F]) -> String {
    fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

/// Append `offset` when paging past the first page
pub fn push_offset(query: &mut QueryParams, offset: i64) {
    if offset > 0 {
        query.push(("offset", offset.to_string()));
    }
}

/// Append `data_fields` when any were requested
pub fn push_data_fields<F: AsRef<str>>(query: &mut QueryParams, fields: &[F]) {
    if !fields.is_empty() {
        query.push(("data_fields", join_fields(fields)));
    }
}

/// Append a `lastupdate` filter, or the date window when no `lastupdate` is set
pub fn push_time_window(
    query: &mut QueryParams,
    last_update: Option<DateTime<Utc>>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) {
    if let Some(last_update) = last_update {
        query.push(("lastupdate", unix_seconds(last_update)));
        return;
    }
    if let Some(start) = start {
        query.push(("startdate", unix_seconds(start)));
    }
    if let Some(end) = end {
        query.push(("enddate", unix_seconds(end)));
    }
}

/// Same as [`push_time_window`] for endpoints taking `startdateymd`/`enddateymd`
pub fn push_date_window(
    query: &mut QueryParams,
    last_update: Option<DateTime<Utc>>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) {
    if let Some(last_update) = last_update {
        query.push(("lastupdate", unix_seconds(last_update)));
        return;
    }
    if let Some(start) = start {
        query.push(("startdateymd", ymd(start)));
    }
    if let Some(end) = end {
        query.push(("enddateymd", ymd(end)));
    }
}

/// Decode a `more` flag sent either as a boolean or as `0`/`1`
pub(crate) fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => flag,
        Flag::Int(flag) => flag != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_last_update_takes_precedence() {
        let mut query = QueryParams::new();
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        push_time_window(&mut query, Some(at), Some(at), Some(at));
        assert_eq!(query, vec![("lastupdate", "1700000000".to_owned())]);
    }

    #[test]
    fn test_date_window_uses_ymd() {
        let mut query = QueryParams::new();
        push_date_window(
            &mut query,
            None,
            NaiveDate::from_ymd_opt(2024, 1, 5),
            NaiveDate::from_ymd_opt(2024, 1, 9),
        );
        assert_eq!(
            query,
            vec![
                ("startdateymd", "2024-01-05".to_owned()),
                ("enddateymd", "2024-01-09".to_owned()),
            ]
        );
    }

    #[test]
    fn test_zero_offset_is_omitted() {
        let mut query = QueryParams::new();
        push_offset(&mut query, 0);
        assert!(query.is_empty());
        push_offset(&mut query, 12);
        assert_eq!(query, vec![("offset", "12".to_owned())]);
    }

    #[test]
    fn test_envelope_status_mapping() {
        let envelope = ApiEnvelope::parse(br#"{"status":401,"error":"invalid_token"}"#).unwrap();
        assert!(matches!(
            envelope.into_body::<Value>(),
            Err(ProviderError::AuthenticationFailed { .. })
        ));

        let envelope = ApiEnvelope::parse(br#"{"status":0,"body":{"more":false}}"#).unwrap();
        assert!(envelope.into_body::<Value>().is_ok());
    }

    #[test]
    fn test_garbage_is_invalid_response() {
        assert!(matches!(
            ApiEnvelope::parse(b"<html>"),
            Err(ProviderError::InvalidResponse { .. })
        ));
    }
}
