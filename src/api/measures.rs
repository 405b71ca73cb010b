// ABOUTME: Body measure request (getmeas) and its response body
// ABOUTME: Encodes measure types, category, date window or lastupdate, and paging offset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{flexible_bool, join_fields, push_offset, push_time_window, QueryParams, WithingsRequest};
use crate::constants::{actions, endpoints};
use crate::measurements::{MeasureGroups, MeasureType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which measures to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureCategory {
    /// Measures actually taken
    Real = 1,
    /// User objectives
    Objective = 2,
}

/// Parameters of a `getmeas` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetMeasureParams {
    /// Measure types to return; all types when empty
    pub measure_types: Vec<MeasureType>,
    /// Real measures or objectives; provider default (real) when unset
    pub category: Option<MeasureCategory>,
    /// Window start, ignored when `last_update` is set
    pub start_date: Option<DateTime<Utc>>,
    /// Window end, ignored when `last_update` is set
    pub end_date: Option<DateTime<Utc>>,
    /// Return everything created or updated after this instant
    pub last_update: Option<DateTime<Utc>>,
    /// Paging offset from a previous response with `more` set
    pub offset: i64,
}

impl GetMeasureParams {
    /// Measures of the given types changed since `last_update`
    #[must_use]
    pub fn since(measure_types: Vec<MeasureType>, last_update: DateTime<Utc>) -> Self {
        Self {
            measure_types,
            last_update: Some(last_update),
            ..Self::default()
        }
    }
}

impl WithingsRequest for GetMeasureParams {
    type Response = GetMeasureBody;
    const PATH: &'static str = endpoints::MEASURE;
    const ACTION: &'static str = actions::GET_MEASURE;

    fn params(&self) -> QueryParams {
        let mut query = QueryParams::new();
        if !self.measure_types.is_empty() {
            let codes: Vec<String> = self.measure_types.iter().map(ToString::to_string).collect();
            query.push(("meastypes", join_fields(&codes)));
        }
        if let Some(category) = self.category {
            query.push(("category", (category as i64).to_string()));
        }
        push_time_window(&mut query, self.last_update, self.start_date, self.end_date);
        push_offset(&mut query, self.offset);
        query
    }
}

/// `body` of a `getmeas` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetMeasureBody {
    /// Server time of the response (Unix seconds)
    #[serde(rename = "updatetime", default)]
    pub update_time: i64,
    /// User timezone
    #[serde(default)]
    pub timezone: String,
    /// Measure groups
    #[serde(rename = "measuregrps", default)]
    pub measure_groups: MeasureGroups,
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
    use chrono::TimeZone;

    #[test]
    fn test_query_encoding() {
        let params = GetMeasureParams {
            measure_types: vec![MeasureType::WEIGHT, MeasureType::HEIGHT],
            category: Some(MeasureCategory::Real),
            start_date: Utc.timestamp_opt(1_700_000_000, 0).single(),
            end_date: Utc.timestamp_opt(1_700_086_400, 0).single(),
            last_update: None,
            offset: 3,
        };
        assert_eq!(
            params.query(),
            vec![
                ("action", "getmeas".to_owned()),
                ("meastypes", "1,4".to_owned()),
                ("category", "1".to_owned()),
                ("startdate", "1700000000".to_owned()),
                ("enddate", "1700086400".to_owned()),
                ("offset", "3".to_owned()),
            ]
        );
    }

    #[test]
    fn test_body_accepts_numeric_more_flag() {
        let body: GetMeasureBody = serde_json::from_value(serde_json::json!({
            "updatetime": 1_700_000_000,
            "timezone": "Europe/Paris",
            "measuregrps": [],
            "more": 1,
            "offset": 100
        }))
        .unwrap();
        assert!(body.more);
        assert_eq!(body.offset, 100);
    }
}
