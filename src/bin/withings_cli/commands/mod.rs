// ABOUTME: Re-exports command modules for withings-cli
// ABOUTME: Provides access to OAuth and data retrieval commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod auth;
pub mod data;
