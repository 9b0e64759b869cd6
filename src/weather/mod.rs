//! Weather fetching
//!
//! [`WeatherFetcher`] is the seam between the run orchestrator and the
//! network. [`OpenWeatherClient`] is the production implementation.

use crate::error::FetchError;
use crate::models::WeatherReading;

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Source of current weather readings, one city at a time
pub trait WeatherFetcher {
    /// Fetch the current reading for `city` (e.g. `"Tokyo, JP"`)
    async fn fetch(&self, city: &str) -> Result<WeatherReading, FetchError>;
}
