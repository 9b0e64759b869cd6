//! Comfort Index Calculator
//!
//! Maps temperature, humidity and wind speed to a single pleasantness score in
//! `[0.0, 1.0]`, rounded to two decimals. Each factor is normalized to `[0, 1]`
//! and combined with fixed weights:
//!
//! - temperature rises linearly from 0 at 15°C to 1 at 30°C, flat outside that band
//! - humidity peaks at 45% and decays linearly to 0 at 0% and 90%
//! - wind falls linearly from 1 at calm to 0 at 10 m/s, flat beyond

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

use crate::models::round2;

const TEMPERATURE_WEIGHT: f64 = 0.4;
const HUMIDITY_WEIGHT: f64 = 0.3;
const WIND_WEIGHT: f64 = 0.3;

const COMFORT_TEMP_MIN_C: f64 = 15.0;
const COMFORT_TEMP_MAX_C: f64 = 30.0;
const IDEAL_HUMIDITY_PERCENT: f64 = 45.0;
const MAX_WIND_MPS: f64 = 10.0;

const ABSOLUTE_ZERO_C: f64 = -273.15;
const MAX_PLAUSIBLE_TEMP_C: f64 = 100.0;

/// Why a set of measurements was rejected before computing the index
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InvalidReading {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("temperature {0}°C is outside the plausible range -273.15..=100")]
    TemperatureOutOfRange(f64),

    #[error("humidity {0}% must be between 0 and 100")]
    HumidityOutOfRange(f64),

    #[error("wind speed {0} m/s cannot be negative")]
    NegativeWindSpeed(f64),
}

/// Derived comfort score in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComfortIndex(f64);

impl ComfortIndex {
    /// Value stored for readings that fail validation
    pub const SENTINEL: ComfortIndex = ComfortIndex(0.0);

    /// Validate the measurements and compute the weighted index
    pub fn calculate(
        temperature_celsius: f64,
        humidity_percent: f64,
        wind_speed_mps: f64,
    ) -> Result<Self, InvalidReading> {
        validate(temperature_celsius, humidity_percent, wind_speed_mps)?;

        let score = TEMPERATURE_WEIGHT * temperature_term(temperature_celsius)
            + HUMIDITY_WEIGHT * humidity_term(humidity_percent)
            + WIND_WEIGHT * wind_term(wind_speed_mps);

        Ok(Self(round2(score)))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Coarse human-readable description of the score
    #[must_use]
    pub fn label(self) -> &'static str {
        match self.0 {
            s if s >= 0.8 => "Very comfortable",
            s if s >= 0.6 => "Comfortable",
            s if s >= 0.4 => "Moderate",
            s if s >= 0.2 => "Uncomfortable",
            _ => "Very uncomfortable",
        }
    }
}

impl fmt::Display for ComfortIndex {
    // Always keep a decimal point: 1.0, not 1
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Compute the comfort index, returning the sentinel `0.0` for invalid input.
///
/// The cause is logged; the caller never sees an error. Use
/// [`ComfortIndex::calculate`] when the caller needs to tell the two apart.
#[must_use]
pub fn compute(temperature_celsius: f64, humidity_percent: f64, wind_speed_mps: f64) -> f64 {
    match ComfortIndex::calculate(temperature_celsius, humidity_percent, wind_speed_mps) {
        Ok(index) => index.value(),
        Err(reason) => {
            warn!("Error calculating comfort index: {}", reason);
            ComfortIndex::SENTINEL.value()
        }
    }
}

/// What the orchestrator does with a reading that fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvalidReadingPolicy {
    /// Store the record with a comfort index of 0.0
    #[default]
    #[serde(rename = "sentinel")]
    StoreSentinel,
    /// Leave the record out of the output table
    #[serde(rename = "skip")]
    SkipRecord,
}

impl FromStr for InvalidReadingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentinel" => Ok(Self::StoreSentinel),
            "skip" => Ok(Self::SkipRecord),
            other => Err(format!(
                "invalid reading policy '{other}'. Must be one of: sentinel, skip"
            )),
        }
    }
}

impl fmt::Display for InvalidReadingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReadingPolicy::StoreSentinel => write!(f, "sentinel"),
            InvalidReadingPolicy::SkipRecord => write!(f, "skip"),
        }
    }
}

fn validate(
    temperature_celsius: f64,
    humidity_percent: f64,
    wind_speed_mps: f64,
) -> Result<(), InvalidReading> {
    for (field, value) in [
        ("temperature", temperature_celsius),
        ("humidity", humidity_percent),
        ("wind speed", wind_speed_mps),
    ] {
        if !value.is_finite() {
            return Err(InvalidReading::NotFinite { field, value });
        }
    }

    if !(ABSOLUTE_ZERO_C..=MAX_PLAUSIBLE_TEMP_C).contains(&temperature_celsius) {
        return Err(InvalidReading::TemperatureOutOfRange(temperature_celsius));
    }
    if !(0.0..=100.0).contains(&humidity_percent) {
        return Err(InvalidReading::HumidityOutOfRange(humidity_percent));
    }
    if wind_speed_mps < 0.0 {
        return Err(InvalidReading::NegativeWindSpeed(wind_speed_mps));
    }
    Ok(())
}

// No gradient below 15°C: anything colder scores the same as 15°C.
fn temperature_term(celsius: f64) -> f64 {
    ((celsius - COMFORT_TEMP_MIN_C) / (COMFORT_TEMP_MAX_C - COMFORT_TEMP_MIN_C)).clamp(0.0, 1.0)
}

fn humidity_term(percent: f64) -> f64 {
    (1.0 - (percent - IDEAL_HUMIDITY_PERCENT).abs() / IDEAL_HUMIDITY_PERCENT).clamp(0.0, 1.0)
}

fn wind_term(mps: f64) -> f64 {
    (1.0 - mps.min(MAX_WIND_MPS) / MAX_WIND_MPS).clamp(0.0, 1.0)
}
