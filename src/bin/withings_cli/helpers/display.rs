// ABOUTME: Output formatting helpers for withings-cli
// ABOUTME: Pretty JSON on stdout, token change notices on stderr
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_withings::{errors::AppResult, AccessToken};
use serde::Serialize;

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Announce a refreshed token on stderr so stdout stays parseable
pub fn print_refreshed_token(token: &AccessToken) -> AppResult<()> {
    eprintln!("Token refreshed; the previous refresh token is no longer valid.");
    eprintln!("Save this token (expires {}):", token.expires_at.format("%Y-%m-%d %H:%M UTC"));
    eprintln!("{}", serde_json::to_string_pretty(token)?);
    Ok(())
}
