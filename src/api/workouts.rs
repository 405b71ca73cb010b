// ABOUTME: Workout summary request (getworkouts) and its response body
// ABOUTME: Workout category, timing and optional per-workout metrics
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
    /// Fields that `getworkouts` can return
    WorkoutDataField {
        /// Active calories
        Calories => "calories",
        /// Intensity
        Intensity => "intensity",
        /// Distance entered by the user
        ManualDistance => "manual_distance",
        /// Calories entered by the user
        ManualCalories => "manual_calories",
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
        /// Paused seconds entered by the user
        PauseDuration => "pause_duration",
        /// Paused seconds detected by the device
        AlgoPauseDuration => "algo_pause_duration",
        /// Average SpO2
        Spo2Average => "spo2_average",
        /// Step count
        Steps => "steps",
        /// Distance in meters
        Distance => "distance",
        /// Floors climbed
        Elevation => "elevation",
        /// Pool laps
        PoolLaps => "pool_laps",
        /// Swim strokes
        Strokes => "strokes",
        /// Pool length in meters
        PoolLength => "pool_length",
    }
);

/// Parameters of a `getworkouts` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetWorkoutParams {
    /// Fields to return; provider default when empty
    pub data_fields: Vec<WorkoutDataField>,
    /// First day, ignored when `last_update` is set
    pub start_date: Option<NaiveDate>,
    /// Last day, ignored when `last_update` is set
    pub end_date: Option<NaiveDate>,
    /// Return workouts created or updated after this instant
    pub last_update: Option<DateTime<Utc>>,
    /// Paging offset
    pub offset: i64,
}

impl GetWorkoutParams {
    /// All fields of workouts changed since `last_update`
    #[must_use]
    pub fn since(last_update: DateTime<Utc>) -> Self {
        Self {
            data_fields: WorkoutDataField::ALL.to_vec(),
            last_update: Some(last_update),
            ..Self::default()
        }
    }
}

impl WithingsRequest for GetWorkoutParams {
    type Response = GetWorkoutBody;
    const PATH: &'static str = endpoints::MEASURE_V2;
    const ACTION: &'static str = actions::GET_WORKOUTS;

    fn params(&self) -> QueryParams {
        let mut query = QueryParams::new();
        push_data_fields(&mut query, &self.data_fields);
        push_date_window(&mut query, self.last_update, self.start_date, self.end_date);
        push_offset(&mut query, self.offset);
        query
    }
}

/// Metrics of one workout; absent fields were not requested or not measured
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutData {
    /// Paused seconds detected by the device
    #[serde(default)]
    pub algo_pause_duration: Option<f64>,
    /// Active calories
    #[serde(default)]
    pub calories: Option<f64>,
    /// Distance in meters
    #[serde(default)]
    pub distance: Option<f64>,
    /// Floors climbed
    #[serde(default)]
    pub elevation: Option<f64>,
    /// Average heart rate
    #[serde(default)]
    pub hr_average: Option<f64>,
    /// Maximum heart rate
    #[serde(default)]
    pub hr_max: Option<f64>,
    /// Minimum heart rate
    #[serde(default)]
    pub hr_min: Option<f64>,
    /// Seconds in light zone
    #[serde(default)]
    pub hr_zone_0: Option<f64>,
    /// Seconds in moderate zone
    #[serde(default)]
    pub hr_zone_1: Option<f64>,
    /// Seconds in intense zone
    #[serde(default)]
    pub hr_zone_2: Option<f64>,
    /// Seconds in maximal zone
    #[serde(default)]
    pub hr_zone_3: Option<f64>,
    /// Intensity
    #[serde(default)]
    pub intensity: Option<f64>,
    /// Calories entered by the user
    #[serde(default)]
    pub manual_calories: Option<f64>,
    /// Distance entered by the user
    #[serde(default)]
    pub manual_distance: Option<f64>,
    /// Paused seconds entered by the user
    #[serde(default)]
    pub pause_duration: Option<f64>,
    /// Pool laps
    #[serde(default)]
    pub pool_laps: Option<f64>,
    /// Pool length in meters
    #[serde(default)]
    pub pool_length: Option<f64>,
    /// Average SpO2
    #[serde(default)]
    pub spo2_average: Option<f64>,
    /// Step count
    #[serde(default)]
    pub steps: Option<f64>,
    /// Swim strokes
    #[serde(default)]
    pub strokes: Option<f64>,
}

/// One workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Workout category code
    pub category: i64,
    /// Timezone of the workout
    #[serde(default)]
    pub timezone: String,
    /// Device model code
    #[serde(default)]
    pub model: i64,
    /// How the workout was captured
    #[serde(default)]
    pub attrib: i64,
    /// Start (Unix seconds)
    #[serde(rename = "startdate")]
    pub start_date: i64,
    /// End (Unix seconds)
    #[serde(rename = "enddate")]
    pub end_date: i64,
    /// Day (`YYYY-MM-DD`)
    #[serde(default)]
    pub date: String,
    /// Last modification (Unix seconds)
    #[serde(default)]
    pub modified: i64,
    /// Recording device
    #[serde(rename = "deviceid", default)]
    pub device_id: Option<String>,
    /// Workout metrics
    #[serde(default)]
    pub data: WorkoutData,
}

/// `body` of a `getworkouts` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetWorkoutBody {
    /// Workouts
    #[serde(default)]
    pub series: Vec<Workout>,
    /// More pages are available
    #[serde(default, deserialize_with = "flexible_bool")]
    pub more: bool,
    /// Offset for the next page
    #[serde(default)]
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_window_without_last_update() {
        let params = GetWorkoutParams {
            data_fields: vec![WorkoutDataField::Calories],
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 29),
            last_update: None,
            offset: 0,
        };
        assert_eq!(
            params.query(),
            vec![
                ("action", "getworkouts".to_owned()),
                ("data_fields", "calories".to_owned()),
                ("startdateymd", "2024-02-01".to_owned()),
                ("enddateymd", "2024-02-29".to_owned()),
            ]
        );
    }

    #[test]
    fn test_missing_metrics_decode_as_none() {
        let workout: Workout = serde_json::from_value(serde_json::json!({
            "category": 1,
            "startdate": 1_700_000_000,
            "enddate": 1_700_003_600,
            "data": { "calories": 312.5 }
        }))
        .unwrap();
        assert_eq!(workout.data.calories, Some(312.5));
        assert!(workout.data.steps.is_none());
    }
}
