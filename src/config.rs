//! Configuration management for the `weather-comfort` batch job
//!
//! Layers built-in defaults, `WEATHER_COMFORT_*` environment variables and the
//! OpenWeatherMap API key into an explicit [`AppConfig`], and validates every
//! setting before the run starts.
//!
//! Nested settings use `__` between section and field, e.g.
//! `WEATHER_COMFORT_WEATHER__TIMEOUT_SECONDS` or `WEATHER_COMFORT_OUTPUT__PATH`.

use crate::ComfortError;
use crate::comfort::InvalidReadingPolicy;
use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable holding the OpenWeatherMap API key
pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
/// Key name used by older `.env` files
pub const LEGACY_API_KEY_VAR: &str = "openweather";
/// Prefix for all other settings
pub const ENV_PREFIX: &str = "WEATHER_COMFORT";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Cities to query, in order
    #[serde(default = "default_cities")]
    pub cities: Vec<String>,
    /// Output table configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    #[serde(default)]
    pub api_key: String,
    /// Base URL for the weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
}

/// Output table settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// CSV file the records are appended to
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    /// Handling of readings that fail comfort-index validation
    #[serde(default)]
    pub on_invalid: InvalidReadingPolicy,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_output_path() -> PathBuf {
    PathBuf::from("openweather_data.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[must_use]
pub fn default_cities() -> Vec<String> {
    ["Tokyo, JP", "Chicago, US", "Bremen, US", "London, UK"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig::default(),
            cities: default_cities(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            on_invalid: InvalidReadingPolicy::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Configuration with defaults for everything but the API key
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            weather: WeatherConfig {
                api_key: api_key.into(),
                ..WeatherConfig::default()
            },
            ..Self::default()
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> crate::Result<Self> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Load configuration from a snapshot of environment variables
    pub fn from_vars(vars: HashMap<String, String>) -> crate::Result<Self> {
        let api_key = [API_KEY_VAR, LEGACY_API_KEY_VAR]
            .iter()
            .filter_map(|name| vars.get(*name))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty());

        let settings = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true)
                    .list_separator(";")
                    .with_list_parse_key("cities")
                    .source(Some(vars.into_iter().collect())),
            )
            .set_override_option("weather.api_key", api_key)
            .and_then(|builder| builder.build())
            .map_err(|e| ComfortError::config(format!("Failed to build configuration: {e}")))?;

        let mut config: AppConfig = settings.try_deserialize().map_err(|e| {
            ComfortError::config(format!("Failed to deserialize configuration: {e}"))
        })?;

        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    /// Normalize values the environment may carry in loose form
    pub fn apply_defaults(&mut self) {
        self.cities = self
            .cities
            .iter()
            .map(|city| city.trim())
            .filter(|city| !city.is_empty())
            .map(String::from)
            .collect();
        self.logging.level = self.logging.level.trim().to_ascii_lowercase();
        self.logging.format = self.logging.format.trim().to_ascii_lowercase();
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_api_key(&self) -> crate::Result<()> {
        if self.weather.api_key.trim().is_empty() {
            return Err(ComfortError::config(format!(
                "OpenWeather API key not found. Set {API_KEY_VAR} in the environment or .env file"
            )));
        }
        if self.weather.api_key.chars().any(char::is_whitespace) {
            return Err(ComfortError::config(
                "OpenWeather API key appears to be invalid (contains whitespace)",
            ));
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> crate::Result<()> {
        if self.weather.timeout_seconds == 0 {
            return Err(ComfortError::config(
                "Weather API timeout must be at least 1 second",
            ));
        }
        if self.weather.timeout_seconds > 300 {
            return Err(ComfortError::config(
                "Weather API timeout cannot exceed 300 seconds",
            ));
        }
        Ok(())
    }

    fn validate_string_values(&self) -> crate::Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ComfortError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ComfortError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(ComfortError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            ));
        }

        if self.cities.is_empty() {
            return Err(ComfortError::config("At least one city must be configured"));
        }
        if self.cities.iter().any(|city| city.trim().is_empty()) {
            return Err(ComfortError::validation("City names cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::with_api_key("valid_api_key_123");
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.weather.timeout_seconds, 10);
        assert_eq!(config.cities.len(), 4);
        assert_eq!(config.cities[0], "Tokyo, JP");
        assert_eq!(config.output.path, PathBuf::from("openweather_data.csv"));
        assert_eq!(config.output.on_invalid, InvalidReadingPolicy::StoreSentinel);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let result = AppConfig::from_vars(vars(&[]));
        let err = result.unwrap_err();
        assert!(matches!(err, ComfortError::Config { .. }));
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn test_blank_api_key_is_fatal() {
        let result = AppConfig::from_vars(vars(&[(API_KEY_VAR, "   ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_legacy_api_key_name() {
        let config =
            AppConfig::from_vars(vars(&[(LEGACY_API_KEY_VAR, "abc123")])).unwrap();
        assert_eq!(config.weather.api_key, "abc123");
    }

    #[test]
    fn test_defaults_when_only_key_is_set() {
        let config = AppConfig::from_vars(vars(&[(API_KEY_VAR, " key ")])).unwrap();
        assert_eq!(config.weather.api_key, "key");
        assert_eq!(config.weather.timeout_seconds, 10);
        assert_eq!(config.cities, default_cities());
        assert_eq!(config.output.path, PathBuf::from("openweather_data.csv"));
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_primary_key_wins_over_legacy() {
        let config = AppConfig::from_vars(vars(&[
            (API_KEY_VAR, "primary"),
            (LEGACY_API_KEY_VAR, "legacy"),
        ]))
        .unwrap();
        assert_eq!(config.weather.api_key, "primary");
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::from_vars(vars(&[
            (API_KEY_VAR, "key"),
            ("WEATHER_COMFORT_CITIES", "Paris, FR; Berlin, DE ;"),
            ("WEATHER_COMFORT_OUTPUT__PATH", "/tmp/out.csv"),
            ("WEATHER_COMFORT_WEATHER__TIMEOUT_SECONDS", "5"),
            ("WEATHER_COMFORT_WEATHER__BASE_URL", "http://localhost:8080/data/2.5"),
            ("WEATHER_COMFORT_OUTPUT__ON_INVALID", "skip"),
            ("WEATHER_COMFORT_LOGGING__LEVEL", "DEBUG"),
            ("WEATHER_COMFORT_LOGGING__FORMAT", "json"),
            ("UNRELATED_SETTING", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.cities, vec!["Paris, FR", "Berlin, DE"]);
        assert_eq!(config.output.path, PathBuf::from("/tmp/out.csv"));
        assert_eq!(config.weather.timeout_seconds, 5);
        assert_eq!(config.weather.base_url, "http://localhost:8080/data/2.5");
        assert_eq!(config.output.on_invalid, InvalidReadingPolicy::SkipRecord);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_single_city_from_environment() {
        let config = AppConfig::from_vars(vars(&[
            (API_KEY_VAR, "key"),
            ("WEATHER_COMFORT_CITIES", "Tokyo, JP"),
        ]))
        .unwrap();
        assert_eq!(config.cities, vec!["Tokyo, JP"]);
    }

    #[test]
    fn test_empty_setting_falls_back_to_default() {
        let config = AppConfig::from_vars(vars(&[
            (API_KEY_VAR, "key"),
            ("WEATHER_COMFORT_OUTPUT__PATH", ""),
        ]))
        .unwrap();
        assert_eq!(config.output.path, PathBuf::from("openweather_data.csv"));
    }

    #[test]
    fn test_invalid_timeout_value() {
        let result = AppConfig::from_vars(vars(&[
            (API_KEY_VAR, "key"),
            ("WEATHER_COMFORT_WEATHER__TIMEOUT_SECONDS", "ten"),
        ]));
        let err = result.unwrap_err();
        assert!(matches!(err, ComfortError::Config { .. }));
        assert!(err.to_string().contains("Failed to deserialize configuration"));
    }

    #[test]
    fn test_out_of_range_timeout_from_environment() {
        let result = AppConfig::from_vars(vars(&[
            (API_KEY_VAR, "key"),
            ("WEATHER_COMFORT_WEATHER__TIMEOUT_SECONDS", "999"),
        ]));
        assert!(result.unwrap_err().to_string().contains("cannot exceed"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = AppConfig::with_api_key("key");
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("cannot exceed"));

        config.weather.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AppConfig::with_api_key("key");
        config.logging.level = "loud".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = AppConfig::with_api_key("key");
        config.weather.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_no_cities() {
        let mut config = AppConfig::with_api_key("key");
        config.cities.clear();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("At least one city"));
    }
}
