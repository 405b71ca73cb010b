// ABOUTME: Utility modules shared by the Withings client
// ABOUTME: Currently hosts the HTTP client factory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// HTTP client construction with timeout and TLS options
pub mod http_client;
