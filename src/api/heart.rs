// ABOUTME: Heart recording requests (list, get) and their response bodies
// ABOUTME: ECG and blood pressure recordings plus raw ECG signal retrieval
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{flexible_bool, push_offset, push_time_window, QueryParams, WithingsRequest};
use crate::constants::{actions, endpoints};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameters of a heart `list` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetHeartListParams {
    /// Window start
    pub start_date: Option<DateTime<Utc>>,
    /// Window end
    pub end_date: Option<DateTime<Utc>>,
    /// Paging offset
    pub offset: i64,
}

impl WithingsRequest for GetHeartListParams {
    type Response = GetHeartListBody;
    const PATH: &'static str = endpoints::HEART_V2;
    const ACTION: &'static str = actions::HEART_LIST;

    fn params(&self) -> QueryParams {
        let mut query = QueryParams::new();
        push_time_window(&mut query, None, self.start_date, self.end_date);
        push_offset(&mut query, self.offset);
        query
    }
}

/// ECG part of a recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcgRecording {
    /// Identifier to pass to [`GetHeartSignalParams`]
    #[serde(rename = "signalid")]
    pub signal_id: i64,
    /// Atrial fibrillation classification
    #[serde(default)]
    pub afib: Option<i64>,
}

/// Blood pressure part of a recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureRecording {
    /// Diastolic pressure (mmHg)
    pub diastole: f64,
    /// Systolic pressure (mmHg)
    pub systole: f64,
}

/// One heart recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartSeries {
    /// Recording device
    #[serde(rename = "deviceid", default)]
    pub device_id: Option<String>,
    /// Device model code
    #[serde(default)]
    pub model: Option<i64>,
    /// ECG data, when recorded
    #[serde(default)]
    pub ecg: Option<EcgRecording>,
    /// Blood pressure, when recorded
    #[serde(rename = "bloodpressure", default)]
    pub blood_pressure: Option<BloodPressureRecording>,
    /// Average heart rate during the recording
    #[serde(default)]
    pub heart_rate: Option<f64>,
    /// Recording time (Unix seconds)
    pub timestamp: i64,
    /// Timezone of the recording
    #[serde(default)]
    pub timezone: String,
}

/// `body` of a heart `list` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetHeartListBody {
    /// Recordings
    #[serde(default)]
    pub series: Vec<HeartSeries>,
    /// More pages are available
    #[serde(default, deserialize_with = "flexible_bool")]
    pub more: bool,
    /// Offset for the next page
    #[serde(default)]
    pub offset: i64,
}

/// Parameters of a heart `get` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetHeartSignalParams {
    /// Signal identifier from a heart list entry
    pub signal_id: i64,
}

impl WithingsRequest for GetHeartSignalParams {
    type Response = GetHeartSignalBody;
    const PATH: &'static str = endpoints::HEART_V2;
    const ACTION: &'static str = actions::HEART_GET;

    fn params(&self) -> QueryParams {
        vec![("signalid", self.signal_id.to_string())]
    }
}

/// `body` of a heart `get` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetHeartSignalBody {
    /// Raw samples (µV)
    #[serde(default)]
    pub signal: Vec<i64>,
    /// Samples per second
    #[serde(default)]
    pub sampling_frequency: i64,
    /// Where the device was worn
    #[serde(rename = "wearposition", default)]
    pub wear_position: i64,
}
