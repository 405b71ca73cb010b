// ABOUTME: OAuth 2.0 client for the Withings health data API
// ABOUTME: Authorization URLs, code exchange, token refresh, demo tokens and data calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # OAuth 2.0 Client Module
//!
//! The client acts on behalf of one registered Withings application:
//! - builds the authorization URL a user visits to grant access
//! - exchanges the returned code, and later refresh tokens, for [`AccessToken`]s
//! - executes typed data requests with a given token

/// Withings client and token endpoint calls
pub mod client;
/// Demo account token flow
pub mod demo;
/// Access token value object
pub mod token;

pub use client::{AuthorizationRequest, WithingsClient};
pub use demo::extract_csrf_token;
pub use token::{AccessToken, TokenGrant};
