//! `weather-comfort` - current weather and comfort index for a list of cities
//!
//! This library provides the comfort index computation, the OpenWeatherMap
//! client, the CSV record writer and the run orchestrator that ties them
//! together.

pub mod comfort;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod weather;

// Re-export core types for public API
pub use comfort::{ComfortIndex, InvalidReading, InvalidReadingPolicy, compute};
pub use config::AppConfig;
pub use error::{ComfortError, FetchError};
pub use models::{Record, WeatherReading};
pub use output::{CsvRecordWriter, RecordSink};
pub use pipeline::{Orchestrator, RunSummary, WriteStatus};
pub use weather::{OpenWeatherClient, WeatherFetcher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ComfortError>;
