// ABOUTME: Re-exports helper modules for withings-cli
// ABOUTME: Provides output formatting and token file loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod display;
pub mod token_file;
