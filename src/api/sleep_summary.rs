// ABOUTME: Sleep summary request (getsummary) and its response body
// ABOUTME: Nightly durations, scores and vitals with tolerant decoding of empty data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{
    flexible_bool, push_data_fields, push_date_window, push_offset, QueryParams, WithingsRequest,
};
use crate::constants::{actions, endpoints};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

data_fields!(
    /// Fields that `getsummary` can return
    SleepSummaryDataField {
        /// REM phases count
        NbRemEpisodes => "nb_rem_episodes",
        /// Ratio of total sleep time over time in bed
        SleepEfficiency => "sleep_efficiency",
        /// Seconds to fall asleep
        SleepLatency => "sleep_latency",
        /// Total sleep time
        TotalSleepTime => "total_sleep_time",
        /// Total time in bed
        TotalTimeInBed => "total_timeinbed",
        /// Seconds to get out of bed after waking
        WakeupLatency => "wakeup_latency",
        /// Wake after sleep onset
        Waso => "waso",
        /// Apnea-hypopnea index
        ApneaHypopneaIndex => "apnea_hypopnea_index",
        /// Breathing disturbances intensity
        BreathingDisturbancesIntensity => "breathing_disturbances_intensity",
        /// Seconds asleep
        AsleepDuration => "asleepduration",
        /// Seconds in deep sleep
        DeepSleepDuration => "deepsleepduration",
        /// Seconds to sleep
        DurationToSleep => "durationtosleep",
        /// Seconds to wake up
        DurationToWakeup => "durationtowakeup",
        /// Average heart rate
        HrAverage => "hr_average",
        /// Maximum heart rate
        HrMax => "hr_max",
        /// Minimum heart rate
        HrMin => "hr_min",
        /// Seconds in light sleep
        LightSleepDuration => "lightsleepduration",
        /// Night events
        NightEvents => "night_events",
        /// Times out of bed
        OutOfBedCount => "out_of_bed_count",
        /// Seconds in REM sleep
        RemSleepDuration => "remsleepduration",
        /// Average respiration rate
        RrAverage => "rr_average",
        /// Maximum respiration rate
        RrMax => "rr_max",
        /// Minimum respiration rate
        RrMin => "rr_min",
        /// Sleep score
        SleepScore => "sleep_score",
        /// Seconds snoring
        Snoring => "snoring",
        /// Snoring episodes
        SnoringEpisodeCount => "snoringepisodecount",
        /// Wake ups
        WakeupCount => "wakeupcount",
        /// Seconds awake
        WakeupDuration => "wakeupduration",
    }
);

/// Parameters of a `getsummary` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetSleepSummaryParams {
    /// Fields to return; provider default when empty
    pub data_fields: Vec<SleepSummaryDataField>,
    /// First night, ignored when `last_update` is set
    pub start_date: Option<NaiveDate>,
    /// Last night, ignored when `last_update` is set
    pub end_date: Option<NaiveDate>,
    /// Return summaries created or updated after this instant
    pub last_update: Option<DateTime<Utc>>,
    /// Paging offset
    pub offset: i64,
}

impl GetSleepSummaryParams {
    /// Summaries changed since `last_update`, with the provider's default fields
    #[must_use]
    pub fn since(last_update: DateTime<Utc>) -> Self {
        Self {
            last_update: Some(last_update),
            ..Self::default()
        }
    }
}

impl WithingsRequest for GetSleepSummaryParams {
    type Response = GetSleepSummaryBody;
    const PATH: &'static str = endpoints::SLEEP_V2;
    const ACTION: &'static str = actions::SLEEP_GET_SUMMARY;

    fn params(&self) -> QueryParams {
        let mut query = QueryParams::new();
        push_data_fields(&mut query, &self.data_fields);
        push_date_window(&mut query, self.last_update, self.start_date, self.end_date);
        push_offset(&mut query, self.offset);
        query
    }
}

/// Nightly metrics; absent fields were not requested or not measured
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepSummaryData {
    /// Apnea-hypopnea index
    #[serde(default)]
    pub apnea_hypopnea_index: Option<f64>,
    /// Seconds asleep
    #[serde(rename = "asleepduration", default)]
    pub asleep_duration: Option<f64>,
    /// Breathing disturbances intensity
    #[serde(default)]
    pub breathing_disturbances_intensity: Option<f64>,
    /// Seconds in deep sleep
    #[serde(rename = "deepsleepduration", default)]
    pub deep_sleep_duration: Option<f64>,
    /// Seconds to sleep
    #[serde(rename = "durationtosleep", default)]
    pub duration_to_sleep: Option<f64>,
    /// Seconds to wake up
    #[serde(rename = "durationtowakeup", default)]
    pub duration_to_wakeup: Option<f64>,
    /// Average heart rate
    #[serde(default)]
    pub hr_average: Option<f64>,
    /// Maximum heart rate
    #[serde(default)]
    pub hr_max: Option<f64>,
    /// Minimum heart rate
    #[serde(default)]
    pub hr_min: Option<f64>,
    /// Seconds in light sleep
    #[serde(rename = "lightsleepduration", default)]
    pub light_sleep_duration: Option<f64>,
    /// REM phases count
    #[serde(default)]
    pub nb_rem_episodes: Option<f64>,
    /// Night events, passed through untouched
    #[serde(default)]
    pub night_events: Option<Value>,
    /// Times out of bed
    #[serde(default)]
    pub out_of_bed_count: Option<f64>,
    /// Seconds in REM sleep
    #[serde(rename = "remsleepduration", default)]
    pub rem_sleep_duration: Option<f64>,
    /// Average respiration rate
    #[serde(default)]
    pub rr_average: Option<f64>,
    /// Maximum respiration rate
    #[serde(default)]
    pub rr_max: Option<f64>,
    /// Minimum respiration rate
    #[serde(default)]
    pub rr_min: Option<f64>,
    /// Ratio of total sleep time over time in bed
    #[serde(default)]
    pub sleep_efficiency: Option<f64>,
    /// Seconds to fall asleep
    #[serde(default)]
    pub sleep_latency: Option<f64>,
    /// Sleep score
    #[serde(default)]
    pub sleep_score: Option<f64>,
    /// Seconds snoring
    #[serde(default)]
    pub snoring: Option<f64>,
    /// Snoring episodes
    #[serde(rename = "snoringepisodecount", default)]
    pub snoring_episode_count: Option<f64>,
    /// Total sleep time
    #[serde(default)]
    pub total_sleep_time: Option<f64>,
    /// Total time in bed
    #[serde(rename = "total_timeinbed", default)]
    pub total_time_in_bed: Option<f64>,
    /// Seconds to get out of bed after waking
    #[serde(default)]
    pub wakeup_latency: Option<f64>,
    /// Wake ups
    #[serde(rename = "wakeupcount", default)]
    pub wakeup_count: Option<f64>,
    /// Seconds awake
    #[serde(rename = "wakeupduration", default)]
    pub wakeup_duration: Option<f64>,
    /// Wake after sleep onset
    #[serde(default)]
    pub waso: Option<f64>,
}

/// One night
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSummary {
    /// Timezone of the night
    #[serde(default)]
    pub timezone: String,
    /// Device model code
    #[serde(default)]
    pub model: i64,
    /// Device model identifier
    #[serde(default)]
    pub model_id: i64,
    /// Start (Unix seconds)
    #[serde(rename = "startdate")]
    pub start_date: i64,
    /// End (Unix seconds)
    #[serde(rename = "enddate")]
    pub end_date: i64,
    /// Day (`YYYY-MM-DD`)
    #[serde(default)]
    pub date: String,
    /// Creation (Unix seconds)
    #[serde(default)]
    pub created: i64,
    /// Last modification (Unix seconds)
    #[serde(default)]
    pub modified: i64,
    /// Metrics; the provider sends `[]` instead of `{}` when none match
    #[serde(default, deserialize_with = "data_or_empty_array")]
    pub data: SleepSummaryData,
}

fn data_or_empty_array<'de, D>(deserializer: D) -> Result<SleepSummaryData, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) if items.is_empty() => Ok(SleepSummaryData::default()),
        Value::Null => Ok(SleepSummaryData::default()),
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}

/// `body` of a `getsummary` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetSleepSummaryBody {
    /// Nights
    #[serde(default)]
    pub series: Vec<SleepSummary>,
    /// More pages are available
    #[serde(default, deserialize_with = "flexible_bool")]
    pub more: bool,
    /// Offset for the next page
    #[serde(default)]
    pub offset: i64,
}
