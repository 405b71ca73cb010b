// ABOUTME: OAuth commands for withings-cli
// ABOUTME: Authorization URL, code exchange, token refresh and demo token acquisition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::helpers::{display::print_json, token_file::read_token};
use pierre_withings::{errors::AppResult, WithingsClient};
use std::path::Path;
use tracing::info;

type Result<T> = AppResult<T>;

/// Print the authorization URL and the state to verify on callback
pub fn url(client: &WithingsClient, scopes: &str, state: &str) -> Result<()> {
    let scopes: Vec<&str> = scopes
        .split(',')
        .map(str::trim)
        .filter(|scope| !scope.is_empty())
        .collect();
    let request = client.authorization_url(&scopes, state)?;

    println!("{}", request.url);
    println!("state: {}", request.state);
    Ok(())
}

/// Exchange an authorization code and print the token
pub async fn exchange(client: &WithingsClient, code: &str) -> Result<()> {
    let token = client.exchange_code(code).await?;
    info!("Obtained token for Withings user {}", token.user_id);
    print_json(&token)
}

/// Refresh a stored token and print the replacement
pub async fn refresh(client: &WithingsClient, token_file: &Path) -> Result<()> {
    let token = read_token(token_file).await?;
    let refreshed = client.refresh_access_token(&token).await?;
    info!("Refreshed token, new expiry {}", refreshed.expires_at);
    print_json(&refreshed)
}

/// Obtain and print a demo account token
pub async fn demo(client: &WithingsClient) -> Result<()> {
    let token = client.demo_access_token().await?;
    print_json(&token)
}
