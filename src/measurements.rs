// ABOUTME: Withings body measure model and typed unit conversions
// ABOUTME: Turns raw value/unit pairs into weights, heights, temperatures and ECG readings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Measurements
//!
//! Withings encodes each measure as an integer `value` and a power-of-ten `unit`
//! (`72_350` with unit `-3` is 72.35). [`Measure::decimal_value`] applies the
//! exponent; [`Measure::to`] converts into one of the typed readings below,
//! attaching the timestamp, device and group of the enclosing [`MeasureGroup`].

use crate::constants::units::{
    FAHRENHEIT_OFFSET, FAHRENHEIT_PER_CELSIUS, METERS_PER_FOOT, POUNDS_PER_KILOGRAM,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Withings measure type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasureType(pub i64);

impl MeasureType {
    /// Weight (kg)
    pub const WEIGHT: Self = Self(1);
    /// Height (m)
    pub const HEIGHT: Self = Self(4);
    /// Fat free mass (kg)
    pub const FAT_FREE_MASS: Self = Self(5);
    /// Fat ratio (%)
    pub const FAT_RATIO: Self = Self(6);
    /// Fat mass weight (kg)
    pub const FAT_MASS_WEIGHT: Self = Self(8);
    /// Diastolic blood pressure (mmHg)
    pub const DIASTOLIC_BLOOD_PRESSURE: Self = Self(9);
    /// Systolic blood pressure (mmHg)
    pub const SYSTOLIC_BLOOD_PRESSURE: Self = Self(10);
    /// Heart pulse (bpm)
    pub const HEART_PULSE: Self = Self(11);
    /// Temperature (°C)
    pub const TEMPERATURE: Self = Self(12);
    /// SpO2 (%)
    pub const SPO2: Self = Self(54);
    /// Body temperature (°C)
    pub const BODY_TEMPERATURE: Self = Self(71);
    /// Skin temperature (°C)
    pub const SKIN_TEMPERATURE: Self = Self(73);
    /// Muscle mass (kg)
    pub const MUSCLE_MASS: Self = Self(76);
    /// Hydration (kg)
    pub const HYDRATION: Self = Self(77);
    /// Bone mass (kg)
    pub const BONE_MASS: Self = Self(88);
    /// Pulse wave velocity (m/s)
    pub const PULSE_WAVE_VELOCITY: Self = Self(91);
    /// VO2 max (ml/min/kg)
    pub const VO2_MAX: Self = Self(123);
    /// QRS interval duration from ECG (ms)
    pub const QRS_INTERVAL: Self = Self(135);
    /// PR interval duration from ECG (ms)
    pub const PR_INTERVAL: Self = Self(136);
    /// QT interval duration from ECG (ms)
    pub const QT_INTERVAL: Self = Self(137);
    /// Corrected QT interval duration from ECG (ms)
    pub const CORRECTED_QT_INTERVAL: Self = Self(138);
    /// Atrial fibrillation result from PPG
    pub const AFIB_RESULT: Self = Self(139);
}

impl fmt::Display for MeasureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<i64> for MeasureType {
    fn as_ref(&self) -> &i64 {
        &self.0
    }
}

/// A single raw measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    /// Mantissa
    pub value: i64,
    /// Measure type code
    #[serde(rename = "type")]
    pub measure_type: MeasureType,
    /// Power of ten applied to `value`
    pub unit: i32,
}

impl Measure {
    /// `value × 10^unit`
    #[must_use]
    pub fn decimal_value(&self) -> f64 {
        self.value as f64 * 10_f64.powi(self.unit)
    }

    /// Convert into a typed reading, or `None` if this measure is of another type
    #[must_use]
    pub fn to<T: FromMeasure>(&self, group: Option<&MeasureGroup>) -> Option<T> {
        (self.measure_type == T::MEASURE_TYPE)
            .then(|| T::from_measure(self.decimal_value(), MeasureContext::from_group(group)))
    }
}

/// Measures taken together (e.g. one weigh-in)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureGroup {
    /// Group identifier
    #[serde(rename = "grpid")]
    pub group_id: i64,
    /// How the group was captured (device, manual entry, ...)
    #[serde(default)]
    pub attrib: i64,
    /// When the measures were taken (Unix seconds)
    pub date: i64,
    /// When the group was stored (Unix seconds)
    pub created: i64,
    /// `1` for real measures, `2` for user objectives
    #[serde(default)]
    pub category: i64,
    /// Capturing device, absent for manual entries
    #[serde(rename = "deviceid", default)]
    pub device_id: Option<String>,
    /// Measures of the group
    #[serde(default)]
    pub measures: Vec<Measure>,
    /// Free text attached by the user
    #[serde(default)]
    pub comment: Option<String>,
}

/// Groups returned by `getmeas`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasureGroups(pub Vec<MeasureGroup>);

impl MeasureGroups {
    /// Every reading of type `T` across all groups
    #[must_use]
    pub fn collect<T: FromMeasure>(&self) -> Vec<T> {
        self.0
            .iter()
            .flat_map(|group| {
                group
                    .measures
                    .iter()
                    .filter_map(move |measure| measure.to::<T>(Some(group)))
            })
            .collect()
    }

    /// Iterate over the groups
    pub fn iter(&self) -> std::slice::Iter<'_, MeasureGroup> {
        self.0.iter()
    }

    /// Number of groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no group was returned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Group metadata carried by every typed reading
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureContext {
    /// When the group was stored; `None` without a group
    pub created: Option<DateTime<Utc>>,
    /// Capturing device
    pub device_id: Option<String>,
    /// Group identifier
    pub group_id: Option<i64>,
}

impl MeasureContext {
    fn from_group(group: Option<&MeasureGroup>) -> Self {
        group.map_or_else(Self::default, |group| Self {
            created: DateTime::from_timestamp(group.created, 0),
            device_id: group.device_id.clone(),
            group_id: Some(group.group_id),
        })
    }
}

/// A typed reading built from one measure type
pub trait FromMeasure: Sized {
    /// Measure type this reading is built from
    const MEASURE_TYPE: MeasureType;

    /// Build the reading from the decimal value
    fn from_measure(value: f64, context: MeasureContext) -> Self;
}

fn pounds(kilograms: f64) -> f64 {
    kilograms * POUNDS_PER_KILOGRAM
}

fn fahrenheit(celsius: f64) -> f64 {
    celsius.mul_add(FAHRENHEIT_PER_CELSIUS, FAHRENHEIT_OFFSET)
}

macro_rules! mass_reading {
    ($(#[$meta:meta])* $name:ident, $measure_type:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            /// Kilograms
            pub kilograms: f64,
            /// Pounds
            pub pounds: f64,
            /// Group metadata
            #[serde(flatten)]
            pub context: MeasureContext,
        }

        impl FromMeasure for $name {
            const MEASURE_TYPE: MeasureType = $measure_type;

            fn from_measure(value: f64, context: MeasureContext) -> Self {
                Self {
                    kilograms: value,
                    pounds: pounds(value),
                    context,
                }
            }
        }
    };
}

macro_rules! temperature_reading {
    ($(#[$meta:meta])* $name:ident, $measure_type:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            /// Degrees Celsius
            pub celsius: f64,
            /// Degrees Fahrenheit
            pub fahrenheit: f64,
            /// Group metadata
            #[serde(flatten)]
            pub context: MeasureContext,
        }

        impl FromMeasure for $name {
            const MEASURE_TYPE: MeasureType = $measure_type;

            fn from_measure(value: f64, context: MeasureContext) -> Self {
                Self {
                    celsius: value,
                    fahrenheit: fahrenheit(value),
                    context,
                }
            }
        }
    };
}

macro_rules! scalar_reading {
    ($(#[$meta:meta])* $name:ident, $field:ident, $measure_type:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[allow(missing_docs)]
            pub $field: f64,
            /// Group metadata
            #[serde(flatten)]
            pub context: MeasureContext,
        }

        impl FromMeasure for $name {
            const MEASURE_TYPE: MeasureType = $measure_type;

            fn from_measure(value: f64, context: MeasureContext) -> Self {
                Self {
                    $field: value,
                    context,
                }
            }
        }
    };
}

mass_reading!(
    /// Body weight
    WeightMeasurement,
    MeasureType::WEIGHT
);
mass_reading!(
    /// Fat free mass
    FatFreeMassMeasurement,
    MeasureType::FAT_FREE_MASS
);
mass_reading!(
    /// Fat mass
    FatMassWeightMeasurement,
    MeasureType::FAT_MASS_WEIGHT
);
mass_reading!(
    /// Muscle mass
    MuscleMassMeasurement,
    MeasureType::MUSCLE_MASS
);
mass_reading!(
    /// Body water
    HydrationMeasurement,
    MeasureType::HYDRATION
);
mass_reading!(
    /// Bone mass
    BoneMassMeasurement,
    MeasureType::BONE_MASS
);

temperature_reading!(
    /// Temperature
    TemperatureMeasurement,
    MeasureType::TEMPERATURE
);
temperature_reading!(
    /// Body temperature
    BodyTemperatureMeasurement,
    MeasureType::BODY_TEMPERATURE
);
temperature_reading!(
    /// Skin temperature
    SkinTemperatureMeasurement,
    MeasureType::SKIN_TEMPERATURE
);

scalar_reading!(
    /// Fat ratio in percent
    FatRatioMeasurement,
    percentage,
    MeasureType::FAT_RATIO
);
scalar_reading!(
    /// Diastolic blood pressure in mmHg
    DiastolicBloodPressureMeasurement,
    mmhg,
    MeasureType::DIASTOLIC_BLOOD_PRESSURE
);
scalar_reading!(
    /// Systolic blood pressure in mmHg
    SystolicBloodPressureMeasurement,
    mmhg,
    MeasureType::SYSTOLIC_BLOOD_PRESSURE
);
scalar_reading!(
    /// Heart pulse in beats per minute
    HeartPulseMeasurement,
    bpm,
    MeasureType::HEART_PULSE
);
scalar_reading!(
    /// Blood oxygen saturation in percent
    Spo2Measurement,
    percentage,
    MeasureType::SPO2
);
scalar_reading!(
    /// Pulse wave velocity in m/s
    PulseWaveVelocityMeasurement,
    meters_per_second,
    MeasureType::PULSE_WAVE_VELOCITY
);
scalar_reading!(
    /// VO2 max in ml/min/kg
    Vo2MaxMeasurement,
    ml_per_min_per_kg,
    MeasureType::VO2_MAX
);
scalar_reading!(
    /// QRS interval in milliseconds
    QrsIntervalMeasurement,
    milliseconds,
    MeasureType::QRS_INTERVAL
);
scalar_reading!(
    /// PR interval in milliseconds
    PrIntervalMeasurement,
    milliseconds,
    MeasureType::PR_INTERVAL
);
scalar_reading!(
    /// QT interval in milliseconds
    QtIntervalMeasurement,
    milliseconds,
    MeasureType::QT_INTERVAL
);
scalar_reading!(
    /// Corrected QT interval in milliseconds
    CorrectedQtIntervalMeasurement,
    milliseconds,
    MeasureType::CORRECTED_QT_INTERVAL
);
scalar_reading!(
    /// Atrial fibrillation classification as reported by the device
    AfibResultMeasurement,
    value,
    MeasureType::AFIB_RESULT
);

/// Height, in meters and feet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightMeasurement {
    /// Meters
    pub meters: f64,
    /// Feet
    pub feet: f64,
    /// Group metadata
    #[serde(flatten)]
    pub context: MeasureContext,
}

impl FromMeasure for HeightMeasurement {
    const MEASURE_TYPE: MeasureType = MeasureType::HEIGHT;

    fn from_measure(value: f64, context: MeasureContext) -> Self {
        Self {
            meters: value,
            feet: value / METERS_PER_FOOT,
            context,
        }
    }
}

impl MeasureGroups {
    /// Body weights
    #[must_use]
    pub fn weights(&self) -> Vec<WeightMeasurement> {
        self.collect()
    }

    /// Heights
    #[must_use]
    pub fn heights(&self) -> Vec<HeightMeasurement> {
        self.collect()
    }

    /// Fat free masses
    #[must_use]
    pub fn fat_free_masses(&self) -> Vec<FatFreeMassMeasurement> {
        self.collect()
    }

    /// Fat ratios
    #[must_use]
    pub fn fat_ratios(&self) -> Vec<FatRatioMeasurement> {
        self.collect()
    }

    /// Fat masses
    #[must_use]
    pub fn fat_mass_weights(&self) -> Vec<FatMassWeightMeasurement> {
        self.collect()
    }

    /// Diastolic blood pressures
    #[must_use]
    pub fn diastolic_blood_pressures(&self) -> Vec<DiastolicBloodPressureMeasurement> {
        self.collect()
    }

    /// Systolic blood pressures
    #[must_use]
    pub fn systolic_blood_pressures(&self) -> Vec<SystolicBloodPressureMeasurement> {
        self.collect()
    }

    /// Heart pulses
    #[must_use]
    pub fn heart_pulses(&self) -> Vec<HeartPulseMeasurement> {
        self.collect()
    }

    /// Temperatures
    #[must_use]
    pub fn temperatures(&self) -> Vec<TemperatureMeasurement> {
        self.collect()
    }

    /// SpO2 readings
    #[must_use]
    pub fn spo2s(&self) -> Vec<Spo2Measurement> {
        self.collect()
    }

    /// Body temperatures
    #[must_use]
    pub fn body_temperatures(&self) -> Vec<BodyTemperatureMeasurement> {
        self.collect()
    }

    /// Skin temperatures
    #[must_use]
    pub fn skin_temperatures(&self) -> Vec<SkinTemperatureMeasurement> {
        self.collect()
    }

    /// Muscle masses
    #[must_use]
    pub fn muscle_masses(&self) -> Vec<MuscleMassMeasurement> {
        self.collect()
    }

    /// Hydration readings
    #[must_use]
    pub fn hydrations(&self) -> Vec<HydrationMeasurement> {
        self.collect()
    }

    /// Bone masses
    #[must_use]
    pub fn bone_masses(&self) -> Vec<BoneMassMeasurement> {
        self.collect()
    }

    /// Pulse wave velocities
    #[must_use]
    pub fn pulse_wave_velocities(&self) -> Vec<PulseWaveVelocityMeasurement> {
        self.collect()
    }

    /// VO2 max readings
    #[must_use]
    pub fn vo2_maxes(&self) -> Vec<Vo2MaxMeasurement> {
        self.collect()
    }

    /// QRS intervals
    #[must_use]
    pub fn qrs_intervals(&self) -> Vec<QrsIntervalMeasurement> {
        self.collect()
    }

    /// PR intervals
    #[must_use]
    pub fn pr_intervals(&self) -> Vec<PrIntervalMeasurement> {
        self.collect()
    }

    /// QT intervals
    #[must_use]
    pub fn qt_intervals(&self) -> Vec<QtIntervalMeasurement> {
        self.collect()
    }

    /// Corrected QT intervals
    #[must_use]
    pub fn corrected_qt_intervals(&self) -> Vec<CorrectedQtIntervalMeasurement> {
        self.collect()
    }

    /// AFib results
    #[must_use]
    pub fn afib_results(&self) -> Vec<AfibResultMeasurement> {
        self.collect()
    }
}
