// ABOUTME: Device list request (getdevice) and its response body
// ABOUTME: Devices linked to the authorized user with battery and last sync
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{QueryParams, WithingsRequest};
use crate::constants::{actions, endpoints};
use serde::{Deserialize, Serialize};

/// Parameters of a `getdevice` call (none besides the action)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetDevicesParams;

impl WithingsRequest for GetDevicesParams {
    type Response = GetDevicesBody;
    const PATH: &'static str = endpoints::USER_V2;
    const ACTION: &'static str = actions::USER_GET_DEVICE;

    fn params(&self) -> QueryParams {
        QueryParams::new()
    }
}

/// A device linked to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Device family (Scale, Activity Tracker, ...)
    #[serde(rename = "type")]
    pub device_type: String,
    /// Model name
    pub model: String,
    /// Model code
    #[serde(default)]
    pub model_id: i64,
    /// Battery level (low, medium, high)
    #[serde(default)]
    pub battery: String,
    /// Device identifier
    #[serde(rename = "deviceid")]
    pub device_id: String,
    /// Hashed device identifier
    #[serde(rename = "hash_deviceid", default)]
    pub hash_device_id: Option<String>,
    /// Device timezone
    #[serde(default)]
    pub timezone: String,
    /// Last synchronization (Unix seconds)
    #[serde(default)]
    pub last_session_date: Option<i64>,
}

/// `body` of a `getdevice` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetDevicesBody {
    /// Linked devices
    #[serde(default)]
    pub devices: Vec<Device>,
}
