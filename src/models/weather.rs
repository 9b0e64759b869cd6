//! Weather reading model and unit conversions

use super::round2;
use crate::comfort::{ComfortIndex, InvalidReading};

/// One snapshot of weather measurements for a city at fetch time
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    /// City name as reported by the weather API
    pub city_name: String,
    /// Temperature in Celsius
    pub temperature_celsius: f64,
    /// Relative humidity (0-100)
    pub humidity_percent: f64,
    /// Wind speed in m/s
    pub wind_speed_mps: f64,
}

impl WeatherReading {
    pub fn new(
        city_name: impl Into<String>,
        temperature_celsius: f64,
        humidity_percent: f64,
        wind_speed_mps: f64,
    ) -> Self {
        Self {
            city_name: city_name.into(),
            temperature_celsius,
            humidity_percent,
            wind_speed_mps,
        }
    }

    /// Convert temperature from Celsius to Fahrenheit
    #[must_use]
    pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
        celsius * 9.0 / 5.0 + 32.0
    }

    /// Temperature in Fahrenheit, rounded to two decimals
    #[must_use]
    pub fn temperature_fahrenheit(&self) -> f64 {
        round2(Self::celsius_to_fahrenheit(self.temperature_celsius))
    }

    /// Comfort index for this reading
    pub fn comfort_index(&self) -> Result<ComfortIndex, InvalidReading> {
        ComfortIndex::calculate(
            self.temperature_celsius,
            self.humidity_percent,
            self.wind_speed_mps,
        )
    }
}
