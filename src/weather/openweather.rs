//! OpenWeatherMap "current weather" client
//!
//! One GET per city against `{base_url}/weather` with metric units. No retries:
//! every failure is returned to the caller as a [`FetchError`].

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use super::WeatherFetcher;
use crate::config::WeatherConfig;
use crate::error::FetchError;
use crate::models::WeatherReading;
use crate::ComfortError;

/// Weather API client for OpenWeatherMap
pub struct OpenWeatherClient {
    /// HTTP client with the per-request timeout applied
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// Create a new client from the weather settings
    pub fn new(config: &WeatherConfig) -> crate::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("weather-comfort/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ComfortError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn request_url(&self, city: &str) -> String {
        format!(
            "{}/weather?q={}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(city),
            urlencoding::encode(&self.api_key)
        )
    }

    /// Request URL with the API key masked, safe for logs
    fn redacted_url(&self, city: &str) -> String {
        format!(
            "{}/weather?q={}&appid=***&units=metric",
            self.base_url,
            urlencoding::encode(city)
        )
    }
}

impl WeatherFetcher for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch(&self, city: &str) -> Result<WeatherReading, FetchError> {
        debug!("OpenWeather request URL: {}", self.redacted_url(city));
        let start_time = Instant::now();

        let response = self.client.get(self.request_url(city)).send().await?;
        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        check_status(city, status)?;

        let body = response.text().await?;
        let reading = parse_current_weather(city, &body)?;

        let total_duration = start_time.elapsed();
        debug!(
            "Fetched weather for '{}' in {:.3}s",
            city,
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!("Slow API response detected: {:.3}s", total_duration.as_secs_f64());
        }

        Ok(reading)
    }
}

/// Map an HTTP status to a fetch failure
pub fn check_status(city: &str, status: StatusCode) -> Result<(), FetchError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::UNAUTHORIZED => Err(FetchError::Unauthorized),
        StatusCode::NOT_FOUND => Err(FetchError::NotFound {
            city: city.to_string(),
        }),
        StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
        s => Err(FetchError::Transport(format!(
            "API request failed with status: {} - {}",
            s.as_u16(),
            s.canonical_reason().unwrap_or("Unknown error")
        ))),
    }
}

/// Parse a current-weather payload into a reading
pub fn parse_current_weather(city: &str, body: &str) -> Result<WeatherReading, FetchError> {
    let payload: response::CurrentWeather = serde_json::from_str(body)
        .map_err(|e| FetchError::Malformed(format!("invalid JSON for '{city}': {e}")))?;

    let cod = payload.cod.ok_or_else(|| {
        FetchError::Malformed(format!(
            "invalid format for '{city}'. Check country code and city"
        ))
    })?;

    if !cod.is_ok() {
        let code = cod.code();
        if code == "404" {
            return Err(FetchError::NotFound {
                city: city.to_string(),
            });
        }
        return Err(FetchError::Api {
            code,
            message: payload.message.unwrap_or_default(),
        });
    }

    let missing = |field: &str| FetchError::Malformed(format!("missing '{field}' for '{city}'"));

    let main = payload.main.ok_or_else(|| missing("main"))?;
    let temperature = main.temp.ok_or_else(|| missing("main.temp"))?;
    let humidity = main.humidity.ok_or_else(|| missing("main.humidity"))?;
    let wind_speed = payload
        .wind
        .and_then(|wind| wind.speed)
        .ok_or_else(|| missing("wind.speed"))?;
    let name = payload
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| missing("name"))?;

    Ok(WeatherReading::new(name, temperature, humidity, wind_speed))
}

/// OpenWeatherMap response structures
mod response {
    use serde::Deserialize;

    /// Current weather response. Only the fields this job reads are modelled.
    #[derive(Debug, Deserialize)]
    pub struct CurrentWeather {
        pub cod: Option<Cod>,
        pub message: Option<String>,
        pub name: Option<String>,
        pub main: Option<Main>,
        pub wind: Option<Wind>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Main {
        pub temp: Option<f64>,
        pub humidity: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Wind {
        pub speed: Option<f64>,
    }

    /// `cod` is a number on success and a string on errors
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub enum Cod {
        Number(i64),
        Text(String),
    }

    impl Cod {
        pub fn code(&self) -> String {
            match self {
                Cod::Number(n) => n.to_string(),
                Cod::Text(s) => s.trim().to_string(),
            }
        }

        pub fn is_ok(&self) -> bool {
            self.code() == "200"
        }
    }
}
