//! Output table row

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::WeatherReading;
use crate::comfort::ComfortIndex;

/// Timestamp layout used in the output table
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column headers in output order
pub const HEADERS: [&str; 7] = [
    "Timestamp",
    "City",
    "Temperature (C)",
    "Temperature (F)",
    "Humidity (%)",
    "Wind Speed (m/s)",
    "Comfort Index",
];

/// One persisted row combining a reading, its derived metrics and the run timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Timestamp", with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "City")]
    pub city_name: String,
    #[serde(rename = "Temperature (C)")]
    pub temperature_celsius: f64,
    #[serde(rename = "Temperature (F)")]
    pub temperature_fahrenheit: f64,
    #[serde(rename = "Humidity (%)")]
    pub humidity_percent: f64,
    #[serde(rename = "Wind Speed (m/s)")]
    pub wind_speed_mps: f64,
    #[serde(rename = "Comfort Index")]
    pub comfort_index: ComfortIndex,
}

impl Record {
    #[must_use]
    pub fn from_reading(
        timestamp: NaiveDateTime,
        reading: &WeatherReading,
        comfort_index: ComfortIndex,
    ) -> Self {
        Self {
            timestamp,
            city_name: reading.city_name.clone(),
            temperature_celsius: reading.temperature_celsius,
            temperature_fahrenheit: reading.temperature_fahrenheit(),
            humidity_percent: reading.humidity_percent,
            wind_speed_mps: reading.wind_speed_mps,
            comfort_index,
        }
    }
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap()
    }

    #[test]
    fn test_record_from_reading() {
        let reading = WeatherReading::new("Tokyo", 25.0, 60.0, 3.0);
        let index = reading.comfort_index().unwrap();
        let record = Record::from_reading(timestamp(), &reading, index);

        assert_eq!(record.city_name, "Tokyo");
        assert_eq!(record.temperature_fahrenheit, 77.0);
        assert_eq!(record.humidity_percent, 60.0);
        assert_eq!(record.comfort_index, index);
    }

    #[test]
    fn test_record_serializes_in_column_order() {
        let reading = WeatherReading::new("London", 22.5, 45.0, 0.0);
        let record = Record::from_reading(timestamp(), &reading, ComfortIndex::SENTINEL);

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&record).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let mut lines = output.lines();

        assert_eq!(lines.next().unwrap(), HEADERS.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "2024-03-09 08:05:00,London,22.5,72.5,45.0,0.0,0.0"
        );
    }
}
