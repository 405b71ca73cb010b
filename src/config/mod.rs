// ABOUTME: Configuration management for the Withings client
// ABOUTME: Re-exports the environment-driven client configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for the Withings client
//!
//! Credentials and transport options are read from `WITHINGS_*` environment
//! variables by [`WithingsConfig::from_env`], or assembled in code with
//! [`WithingsConfig::new`] and its builder methods.

/// Withings OAuth credentials, endpoints and transport options
pub mod withings;

pub use withings::{HttpClientConfig, WithingsConfig, WithingsEndpoints};
