// ABOUTME: Token file loading for withings-cli
// ABOUTME: Reads a JSON-encoded access token; the CLI never writes token files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_withings::{
    errors::{AppError, AppResult},
    AccessToken,
};
use std::path::Path;

/// Load an access token from a JSON file
pub async fn read_token(path: &Path) -> AppResult<AccessToken> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::invalid_input(format!("Cannot read token file {}: {e}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        AppError::invalid_input(format!("Token file {} is not a token: {e}", path.display()))
    })
}
