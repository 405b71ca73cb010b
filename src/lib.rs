// ABOUTME: Main library entry point for the Pierre Withings client
// ABOUTME: OAuth2 token lifecycle, auto-refreshing sessions and typed Withings resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Withings
//!
//! Authenticated client for the Withings health data API.
//!
//! ## Features
//!
//! - **OAuth 2.0**: authorization URLs (with demo mode), code exchange and refresh
//! - **Authorized sessions**: one token per user, refreshed at most once per call
//!   even under concurrent use, with the replacement token reported to the caller
//! - **Typed resources**: measures, activity, intraday activity, workouts, heart,
//!   sleep, sleep summaries, devices and notification subscriptions
//! - **Measurements**: unit-aware conversions of raw body measures
//!
//! ## Example
//!
//! ```rust,no_run
//! use pierre_withings::{api::GetMeasureParams, WithingsClient, WithingsConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> pierre_withings::errors::AppResult<()> {
//! let client = Arc::new(WithingsClient::new(WithingsConfig::from_env()?)?);
//! let token = client.exchange_code("code-from-redirect").await?;
//! let session = client.authorized_session(token);
//!
//! let authorized = session.get_measures(&GetMeasureParams::default()).await;
//! if let Some(new_token) = &authorized.refreshed_token {
//!     println!("persist {}", new_token.access_token);
//! }
//! let weights = authorized.result?.measure_groups.weights();
//! println!("{} weigh-ins", weights.len());
//! # Ok(())
//! # }
//! ```

/// Typed Withings resource requests and responses
pub mod api;

/// Environment-driven configuration
pub mod config;

/// Structured logging setup
pub mod logging;

/// Body measure model and unit conversions
pub mod measurements;

/// OAuth 2.0 client and access tokens
pub mod oauth2_client;

/// Token guard, dispatcher and authorized sessions
pub mod session;

/// HTTP client construction
pub mod utils;

/// Error types, re-exported from the core crate
pub use pierre_withings_core::errors;

/// Constants, re-exported from the core crate
pub use pierre_withings_core::constants;

pub use config::WithingsConfig;
pub use oauth2_client::{AccessToken, AuthorizationRequest, WithingsClient};
pub use session::{Authorized, AuthorizedSession, Clock, SystemClock, TokenGuard, TokenRefresher};
