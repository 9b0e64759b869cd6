//! Console report printed after a run

use std::fmt;

use crate::models::Record;
use crate::pipeline::{RunSummary, WriteStatus};

const SEPARATOR_WIDTH: usize = 40;

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "City: {}", self.city_name)?;
        writeln!(
            f,
            "Temperature: {:?}°C / {:?}°F",
            self.temperature_celsius, self.temperature_fahrenheit
        )?;
        writeln!(f, "Humidity: {:?}%", self.humidity_percent)?;
        writeln!(f, "Wind Speed: {:?} m/s", self.wind_speed_mps)?;
        writeln!(
            f,
            "Comfort Index: {} ({})",
            self.comfort_index,
            self.comfort_index.label()
        )?;
        writeln!(f, "{}", "-".repeat(SEPARATOR_WIDTH))
    }
}

impl fmt::Display for WriteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteStatus::Written { destination, rows } => {
                write!(f, "Data saved to {destination} ({rows} rows)")
            }
            WriteStatus::NothingToWrite => write!(f, "No weather data collected; nothing saved"),
            WriteStatus::Failed {
                destination,
                reason,
            } => write!(f, "Failed to save data in {destination}: {reason}"),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.write_status)?;

        for failure in &self.failures {
            writeln!(f, "Skipped {}: {}", failure.city, failure.error)?;
        }
        for city in &self.skipped_invalid {
            writeln!(f, "Skipped {city}: invalid reading")?;
        }

        if !self.records.is_empty() {
            writeln!(f)?;
        }
        for record in &self.records {
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comfort::ComfortIndex;
    use crate::error::FetchError;
    use crate::models::WeatherReading;
    use crate::pipeline::CityFailure;
    use chrono::NaiveDate;

    fn summary(write_status: WriteStatus) -> RunSummary {
        let timestamp = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let reading = WeatherReading::new("Tokyo", 22.5, 45.0, 0.0);
        let index = ComfortIndex::calculate(22.5, 45.0, 0.0).unwrap();
        RunSummary {
            timestamp,
            records: vec![Record::from_reading(timestamp, &reading, index)],
            failures: vec![CityFailure {
                city: "Bremen, US".to_string(),
                error: FetchError::NotFound {
                    city: "Bremen, US".to_string(),
                },
            }],
            skipped_invalid: vec![],
            write_status,
        }
    }

    #[test]
    fn test_record_block() {
        let text = summary(WriteStatus::NothingToWrite).records[0].to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "City: Tokyo",
                "Temperature: 22.5°C / 72.5°F",
                "Humidity: 45.0%",
                "Wind Speed: 0.0 m/s",
                "Comfort Index: 0.8 (Very comfortable)",
                "----------------------------------------",
            ]
        );
    }

    #[test]
    fn test_whole_numbers_keep_one_decimal() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let reading = WeatherReading::new("Chicago", 30.0, 45.0, 0.0);
        let index = reading.comfort_index().unwrap();
        let text = Record::from_reading(timestamp, &reading, index).to_string();

        assert!(text.contains("Temperature: 30.0°C / 86.0°F\n"));
        assert!(text.contains("Humidity: 45.0%\n"));
        assert!(text.contains("Wind Speed: 0.0 m/s\n"));
        assert!(text.contains("Comfort Index: 1.0 (Very comfortable)\n"));
    }

    #[test]
    fn test_summary_reports_saved_file() {
        let text = summary(WriteStatus::Written {
            destination: "out.csv".to_string(),
            rows: 1,
        })
        .to_string();
        assert!(text.starts_with("Data saved to out.csv (1 rows)"));
        assert!(text.contains("Skipped Bremen, US: city not found: Bremen, US"));
        assert!(text.contains("City: Tokyo"));
    }

    #[test]
    fn test_summary_still_lists_records_when_write_fails() {
        let text = summary(WriteStatus::Failed {
            destination: "out.csv".to_string(),
            reason: "permission denied".to_string(),
        })
        .to_string();
        assert!(text.starts_with("Failed to save data in out.csv: permission denied"));
        assert!(text.contains("Comfort Index: 0.8"));
    }
}
