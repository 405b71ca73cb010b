// ABOUTME: Data retrieval command for withings-cli
// ABOUTME: Fetches one resource through an auto-refreshing session and reports token changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::helpers::{
    display::{print_json, print_refreshed_token},
    token_file::read_token,
};
use crate::Resource;
use chrono::{DateTime, Utc};
use pierre_withings::{
    api::{
        GetActivityParams, GetDevicesParams, GetMeasureParams, GetSleepSummaryParams,
        GetWorkoutParams,
    },
    errors::{AppError, AppResult},
    Authorized, WithingsClient,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

type Result<T> = AppResult<T>;

/// Fetch `resource` and print it; a refreshed token goes to stderr
pub async fn fetch(
    client: WithingsClient,
    resource: Resource,
    token_file: &Path,
    since: Option<i64>,
) -> Result<()> {
    let token = read_token(token_file).await?;
    if token.is_expired(Utc::now()) {
        info!(
            "Stored token expired at {}; it will be refreshed before the request",
            token.expires_at
        );
    }
    let since = since_timestamp(since)?;
    let session = Arc::new(client).authorized_session(token);

    match resource {
        Resource::Measures => {
            report(session.get_measures(&GetMeasureParams::since(Vec::new(), since)).await)
        }
        Resource::Activity => report(session.get_activity(&GetActivityParams::since(since)).await),
        Resource::Workouts => report(session.get_workouts(&GetWorkoutParams::since(since)).await),
        Resource::SleepSummary => {
            report(session.get_sleep_summary(&GetSleepSummaryParams::since(since)).await)
        }
        Resource::Devices => report(session.get_devices(&GetDevicesParams).await),
    }
}

fn since_timestamp(since: Option<i64>) -> Result<DateTime<Utc>> {
    let seconds = since.unwrap_or(0);
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| AppError::invalid_input(format!("--since {seconds} is out of range")))
}

fn report<T: Serialize>(authorized: Authorized<T>) -> Result<()> {
    let (result, refreshed_token) = authorized.into_parts();
    if let Some(token) = &refreshed_token {
        print_refreshed_token(token)?;
    }
    print_json(&result?)
}
