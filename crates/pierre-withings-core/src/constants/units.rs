// ABOUTME: Unit conversion constants for body measurements
// ABOUTME: Provides named constants to eliminate magic numbers in conversions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Pounds per kilogram
pub const POUNDS_PER_KILOGRAM: f64 = 2.204_62;

/// Meters per foot
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Fahrenheit degrees per Celsius degree
pub const FAHRENHEIT_PER_CELSIUS: f64 = 9.0 / 5.0;

/// Fahrenheit value of 0 °C
pub const FAHRENHEIT_OFFSET: f64 = 32.0;
