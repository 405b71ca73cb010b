// ABOUTME: Sleep high frequency request (get) and its response body
// ABOUTME: Sleep state segments with optional per-minute vitals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{push_data_fields, push_time_window, QueryParams, WithingsRequest};
use crate::constants::{actions, endpoints};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

data_fields!(
    /// Fields that sleep `get` can return
    SleepDataField {
        /// Heart rate
        HeartRate => "hr",
        /// Respiration rate
        RespirationRate => "rr",
        /// Snoring
        Snoring => "snoring",
        /// SDNN heart rate variability
        Sdnn1 => "sdnn_1",
        /// RMSSD heart rate variability
        Rmssd => "rmssd",
        /// Movement score
        MovementScore => "mvt_score",
    }
);

/// Parameters of a sleep `get` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetSleepParams {
    /// Window start
    pub start_date: DateTime<Utc>,
    /// Window end
    pub end_date: DateTime<Utc>,
    /// Vitals to return; provider default when empty
    pub data_fields: Vec<SleepDataField>,
}

impl WithingsRequest for GetSleepParams {
    type Response = GetSleepBody;
    const PATH: &'static str = endpoints::SLEEP_V2;
    const ACTION: &'static str = actions::SLEEP_GET;

    fn params(&self) -> QueryParams {
        let mut query = QueryParams::new();
        push_time_window(&mut query, None, Some(self.start_date), Some(self.end_date));
        push_data_fields(&mut query, &self.data_fields);
        query
    }
}

/// Sleep state over a time range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSegment {
    /// Start (Unix seconds)
    #[serde(rename = "startdate")]
    pub start_date: i64,
    /// End (Unix seconds)
    #[serde(rename = "enddate")]
    pub end_date: i64,
    /// 0 awake, 1 light, 2 deep, 3 REM
    pub state: i64,
    /// Device model name
    #[serde(default)]
    pub model: Option<String>,
    /// Device model code
    #[serde(default)]
    pub model_id: Option<i64>,
    /// Hashed device identifier
    #[serde(rename = "hash_deviceid", default)]
    pub hash_device_id: Option<String>,
    /// Heart rate keyed by Unix timestamp
    #[serde(default)]
    pub hr: Option<BTreeMap<String, f64>>,
    /// Respiration rate keyed by Unix timestamp
    #[serde(default)]
    pub rr: Option<BTreeMap<String, f64>>,
    /// Snoring keyed by Unix timestamp
    #[serde(default)]
    pub snoring: Option<BTreeMap<String, f64>>,
    /// SDNN keyed by Unix timestamp
    #[serde(default)]
    pub sdnn_1: Option<BTreeMap<String, f64>>,
    /// RMSSD keyed by Unix timestamp
    #[serde(default)]
    pub rmssd: Option<BTreeMap<String, f64>>,
    /// Movement score keyed by Unix timestamp
    #[serde(default)]
    pub mvt_score: Option<BTreeMap<String, f64>>,
}

/// `body` of a sleep `get` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetSleepBody {
    /// Sleep segments
    #[serde(default)]
    pub series: Vec<SleepSegment>,
}
