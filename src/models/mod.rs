//! Data models for the weather-comfort batch job
//!
//! - Weather: a single reading for a city as returned by the fetcher
//! - Record: one persisted row of the output table

pub mod record;
pub mod weather;

// Re-export all public types for convenient access
pub use record::Record;
pub use weather::WeatherReading;

/// Round to two decimal places.
///
/// Rounds the exact stored value, so `0.105` (held as 0.10499...) gives `0.1`.
#[must_use]
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
