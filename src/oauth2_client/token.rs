// ABOUTME: Withings access token value object and token endpoint body decoding
// ABOUTME: Derives absolute expiry from the grant and applies the refresh skew margin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{oauth::PROVIDER_NAME, token::EXPIRY_SKEW_SECS};
use crate::errors::{ProviderError, ProviderResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Credential pair issued by the Withings token endpoint
///
/// Tokens are immutable values: a refresh produces a new `AccessToken` that
/// replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Withings user the token was issued for
    pub user_id: String,
    /// Bearer credential for data calls
    pub access_token: String,
    /// Credential used to obtain the next token pair
    pub refresh_token: String,
    /// Token type reported by the provider (usually "Bearer")
    pub token_type: String,
    /// Comma-separated scopes granted by the user
    pub scope: String,
    /// CSRF token echoed by the provider, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
    /// Lifetime in seconds as reported by the provider
    pub expires_in: i64,
    /// When the token was received
    pub issued_at: DateTime<Utc>,
    /// `issued_at + expires_in`
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Build a token from a decoded token endpoint body
    ///
    /// # Errors
    ///
    /// Returns `InvalidResponse` when `expires_in` does not yield a representable expiry
    pub fn from_grant(grant: TokenGrant, issued_at: DateTime<Utc>) -> ProviderResult<Self> {
        let expires_at = Duration::try_seconds(grant.expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider: PROVIDER_NAME.to_owned(),
                reason: format!("token lifetime out of range: expires_in={}", grant.expires_in),
            })?;

        Ok(Self {
            user_id: grant.user_id,
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            token_type: grant.token_type,
            scope: grant.scope,
            csrf_token: grant.csrf_token,
            expires_in: grant.expires_in,
            issued_at,
            expires_at,
        })
    }

    /// Expiry minus the skew margin; at or after this instant the token must be refreshed
    ///
    /// `None` when the margin cannot be subtracted from `expires_at`.
    #[must_use]
    pub fn safe_expiry(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .checked_sub_signed(Duration::seconds(EXPIRY_SKEW_SECS))
    }

    /// Whether the token must be refreshed before being used at `now`
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.safe_expiry() {
            Some(safe_expiry) => now >= safe_expiry,
            None => true,
        }
    }

    /// Whether the provider would already reject the token at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// `body` of a successful `requesttoken` response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    /// Withings user ID (sent as a number, occasionally as a string)
    #[serde(rename = "userid", default, deserialize_with = "user_id_from_number_or_string")]
    pub user_id: String,
    /// Bearer credential
    pub access_token: String,
    /// Refresh credential
    pub refresh_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    /// Granted scopes
    #[serde(default)]
    pub scope: String,
    /// CSRF token
    #[serde(default)]
    pub csrf_token: Option<String>,
    /// Token type
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_owned()
}

fn user_id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum UserId {
        Number(i64),
        Text(String),
    }

    Ok(match UserId::deserialize(deserializer)? {
        UserId::Number(id) => id.to_string(),
        UserId::Text(id) => id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn grant(expires_in: i64) -> TokenGrant {
        serde_json::from_value(serde_json::json!({
            "userid": 363,
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": expires_in,
            "scope": "user.metrics,user.activity",
            "token_type": "Bearer"
        }))
        .unwrap()
    }

    #[test]
    fn test_expires_at_is_issued_at_plus_lifetime() {
        let issued = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let token = AccessToken::from_grant(grant(10_800), issued).unwrap();
        assert_eq!(token.user_id, "363");
        assert_eq!(token.expires_at, issued + Duration::seconds(10_800));
        assert!(token.csrf_token.is_none());
    }

    #[test]
    fn test_refresh_margin_applies_before_expiry() {
        let issued = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let token = AccessToken::from_grant(grant(3600), issued).unwrap();

        assert!(!token.needs_refresh(token.expires_at - Duration::seconds(11)));
        assert!(token.needs_refresh(token.expires_at - Duration::seconds(10)));
        assert!(token.needs_refresh(token.expires_at - Duration::seconds(5)));
        assert!(!token.is_expired(token.expires_at - Duration::seconds(5)));
        assert!(token.is_expired(token.expires_at));
    }

    #[test]
    fn test_string_user_id_is_accepted() {
        let grant: TokenGrant = serde_json::from_value(serde_json::json!({
            "userid": "42",
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 30
        }))
        .unwrap();
        assert_eq!(grant.user_id, "42");
        assert_eq!(grant.token_type, "Bearer");
    }

    #[test]
    fn test_token_survives_json_storage() {
        let token =
            AccessToken::from_grant(grant(60), Utc.timestamp_opt(1_700_000_000, 0).unwrap())
                .unwrap();
        let stored = serde_json::to_string(&token).unwrap();
        let restored: AccessToken = serde_json::from_str(&stored).unwrap();
        assert_eq!(restored, token);
    }

    #[test]
    fn test_out_of_range_lifetime_is_rejected() {
        let issued = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let error = AccessToken::from_grant(grant(i64::MAX), issued).unwrap_err();
        assert!(matches!(error, ProviderError::InvalidResponse { .. }));
    }

    #[test]
    fn test_expiry_at_range_limit_needs_refresh() {
        let issued = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut token = AccessToken::from_grant(grant(60), issued).unwrap();
        token.expires_at = DateTime::<Utc>::MIN_UTC;

        assert!(token.safe_expiry().is_none());
        assert!(token.needs_refresh(issued));
    }
}
