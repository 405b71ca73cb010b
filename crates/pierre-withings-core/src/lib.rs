// ABOUTME: Core types and constants for the Pierre Withings API client
// ABOUTME: Foundation crate with error handling and provider constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Withings Core
//!
//! Foundation crate shared by the Withings client and its CLI. It is designed to
//! change infrequently, so the client crate keeps incremental builds cheap.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ProviderError`
//! - **constants**: Endpoint paths, API actions, OAuth scopes, timing and unit constants

/// Unified error handling system with standard error codes
pub mod errors;

/// Withings API constants organized by domain
pub mod constants;
