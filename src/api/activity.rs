// ABOUTME: Daily activity request (getactivity) and its response body
// ABOUTME: Aggregated steps, distance, calories and heart rate zones per day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{
    flexible_bool, push_data_fields, push_date_window, push_offset, QueryParams, WithingsRequest,
};
use crate::constants::{actions, endpoints};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

data_fields!(
    /// Fields that `getactivity` can return
    ActivityDataField {
        /// Step count
        Steps => "steps",
        /// Distance in meters
        Distance => "distance",
        /// Floors climbed
        Elevation => "elevation",
        /// Seconds of soft activity
        Soft => "soft",
        /// Seconds of moderate activity
        Moderate => "moderate",
        /// Seconds of intense activity
        Intense => "intense",
        /// Sum of moderate and intense activity
        Active => "active",
        /// Active calories
        Calories => "calories",
        /// Total calories
        TotalCalories => "totalcalories",
        /// Average heart rate
        HrAverage => "hr_average",
        /// Minimum heart rate
        HrMin => "hr_min",
        /// Maximum heart rate
        HrMax => "hr_max",
        /// Seconds in light zone
        HrZone0 => "hr_zone_0",
        /// Seconds in moderate zone
        HrZone1 => "hr_zone_1",
        /// Seconds in intense zone
        HrZone2 => "hr_zone_2",
        /// Seconds in maximal zone
        HrZone3 => "hr_zone_3",
    }
);

/// Parameters of a `getactivity` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetActivityParams {
    /// Fields to return; provider default when empty
    pub data_fields: Vec<ActivityDataField>,
    /// First day, ignored when `last_update` is set
    pub start_date: Option<NaiveDate>,
    /// Last day, ignored when `last_update` is set
    pub end_date: Option<NaiveDate>,
    /// Return days created or updated after this instant
    pub last_update: Option<DateTime<Utc>>,
    /// Paging offset
    pub offset: i64,
}

impl GetActivityParams {
    /// All fields of days changed since `last_update`
    #[must_use]
    pub fn since(last_update: DateTime<Utc>) -> Self {
        Self {
            data_fields: ActivityDataField::ALL.to_vec(),
            last_update: Some(last_update),
            ..Self::default()
        }
    }
}

impl WithingsRequest for GetActivityParams {
    type Response = GetActivityBody;
    const PATH: &'static str = endpoints::MEASURE_V2;
    const ACTION: &'static str = actions::GET_ACTIVITY;

    fn params(&self) -> QueryParams {
        let mut query = QueryParams::new();
        push_data_fields(&mut query, &self.data_fields);
        push_date_window(&mut query, self.last_update, self.start_date, self.end_date);
        push_offset(&mut query, self.offset);
        query
    }
}

/// One day of activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Day (`YYYY-MM-DD`)
    pub date: String,
    /// Timezone of the day
    #[serde(default)]
    pub timezone: String,
    /// Tracking device
    #[serde(rename = "deviceid", default)]
    pub device_id: Option<String>,
    /// Hashed device identifier
    #[serde(rename = "hash_deviceid", default)]
    pub hash_device_id: Option<String>,
    /// Data source brand
    #[serde(default)]
    pub brand: Option<f64>,
    /// Whether the data comes from a tracker
    #[serde(default)]
    pub is_tracker: bool,
    /// Step count
    #[serde(default)]
    pub steps: Option<f64>,
    /// Distance in meters
    #[serde(default)]
    pub distance: Option<f64>,
    /// Floors climbed
    #[serde(default)]
    pub elevation: Option<f64>,
    /// Seconds of soft activity
    #[serde(default)]
    pub soft: Option<f64>,
    /// Seconds of moderate activity
    #[serde(default)]
    pub moderate: Option<f64>,
    /// Seconds of intense activity
    #[serde(default)]
    pub intense: Option<f64>,
    /// Seconds of moderate and intense activity
    #[serde(default)]
    pub active: Option<f64>,
    /// Active calories
    #[serde(default)]
    pub calories: Option<f64>,
    /// Total calories burned
    #[serde(rename = "totalcalories", default)]
    pub total_calories: Option<f64>,
    /// Average heart rate
    #[serde(default)]
    pub hr_average: Option<f64>,
    /// Minimum heart rate
    #[serde(default)]
    pub hr_min: Option<f64>,
    /// Maximum heart rate
    #[serde(default)]
    pub hr_max: Option<f64>,
    /// Seconds in the light heart rate zone
    #[serde(default)]
    pub hr_zone_0: Option<f64>,
    /// Seconds in the moderate heart rate zone
    #[serde(default)]
    pub hr_zone_1: Option<f64>,
    /// Seconds in the intense heart rate zone
    #[serde(default)]
    pub hr_zone_2: Option<f64>,
    /// Seconds in the maximal heart rate zone
    #[serde(default)]
    pub hr_zone_3: Option<f64>,
}

/// `body` of a `getactivity` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetActivityBody {
    /// Days of activity
    #[serde(default)]
    pub activities: Vec<Activity>,
    /// More pages are available
    #[serde(default, deserialize_with = "flexible_bool")]
    pub more: bool,
    /// Offset for the next page
    #[serde(default)]
    pub offset: i64,
}
