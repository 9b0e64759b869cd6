//! Run orchestration
//!
//! One pass over the configured cities: fetch, score, collect, then a single
//! append to the record sink. Cities are processed strictly one at a time and a
//! failure for one city never aborts the run.

use chrono::{Local, NaiveDateTime};
use tracing::{error, info, instrument, warn};

use crate::comfort::{ComfortIndex, InvalidReadingPolicy};
use crate::config::AppConfig;
use crate::error::FetchError;
use crate::models::{Record, WeatherReading};
use crate::output::RecordSink;
use crate::weather::WeatherFetcher;

/// Outcome of the write step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStatus {
    /// All records were appended to the destination
    Written { destination: String, rows: usize },
    /// Nothing was collected, the destination was not touched
    NothingToWrite,
    /// The destination could not be written
    Failed { destination: String, reason: String },
}

/// A city that produced no record
#[derive(Debug, Clone, PartialEq)]
pub struct CityFailure {
    pub city: String,
    pub error: FetchError,
}

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub timestamp: NaiveDateTime,
    pub records: Vec<Record>,
    pub failures: Vec<CityFailure>,
    /// Cities whose reading failed validation and were left out
    pub skipped_invalid: Vec<String>,
    pub write_status: WriteStatus,
}

impl RunSummary {
    #[must_use]
    pub fn write_succeeded(&self) -> bool {
        !matches!(self.write_status, WriteStatus::Failed { .. })
    }
}

/// Drives one collection run
pub struct Orchestrator<F, S> {
    cities: Vec<String>,
    policy: InvalidReadingPolicy,
    fetcher: F,
    sink: S,
}

impl<F: WeatherFetcher, S: RecordSink> Orchestrator<F, S> {
    pub fn new(config: &AppConfig, fetcher: F, sink: S) -> Self {
        Self {
            cities: config.cities.clone(),
            policy: config.output.on_invalid,
            fetcher,
            sink,
        }
    }

    /// Run with the current local time as the shared record timestamp
    pub async fn run(&mut self) -> RunSummary {
        self.run_at(Local::now().naive_local()).await
    }

    #[instrument(skip(self), fields(cities = self.cities.len()))]
    pub async fn run_at(&mut self, timestamp: NaiveDateTime) -> RunSummary {
        info!("Collecting weather for {} cities", self.cities.len());

        let mut records = Vec::with_capacity(self.cities.len());
        let mut failures = Vec::new();
        let mut skipped_invalid = Vec::new();

        for city in &self.cities {
            let reading = match self.fetcher.fetch(city).await {
                Ok(reading) => reading,
                Err(error) => {
                    warn!("Failed to fetch weather for {}: {}", city, error);
                    failures.push(CityFailure {
                        city: city.clone(),
                        error,
                    });
                    continue;
                }
            };

            match score(&reading, self.policy) {
                Some(index) => records.push(Record::from_reading(timestamp, &reading, index)),
                None => skipped_invalid.push(city.clone()),
            }
        }

        let write_status = if records.is_empty() {
            warn!("No weather data collected, nothing to write");
            WriteStatus::NothingToWrite
        } else {
            self.write(&records)
        };

        info!(
            "Run finished: {} records, {} failed cities, {} skipped readings",
            records.len(),
            failures.len(),
            skipped_invalid.len()
        );

        RunSummary {
            timestamp,
            records,
            failures,
            skipped_invalid,
            write_status,
        }
    }

    fn write(&mut self, records: &[Record]) -> WriteStatus {
        let destination = self.sink.describe();
        match self.sink.append(records) {
            Ok(()) => {
                info!("Data saved to {}", destination);
                WriteStatus::Written {
                    destination,
                    rows: records.len(),
                }
            }
            Err(e) => {
                error!("Error saving to {}: {}", destination, e);
                WriteStatus::Failed {
                    destination,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Consume the orchestrator and hand back the sink
    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Apply the invalid-reading policy. `None` means leave the record out.
fn score(reading: &WeatherReading, policy: InvalidReadingPolicy) -> Option<ComfortIndex> {
    match reading.comfort_index() {
        Ok(index) => Some(index),
        Err(reason) => {
            warn!(
                "Error calculating comfort index for {}: {}",
                reading.city_name, reason
            );
            match policy {
                InvalidReadingPolicy::StoreSentinel => Some(ComfortIndex::SENTINEL),
                InvalidReadingPolicy::SkipRecord => None,
            }
        }
    }
}
