//! Error types and handling for the `weather-comfort` batch job

use thiserror::Error;

/// Main error type for the `weather-comfort` application
#[derive(Error, Debug)]
pub enum ComfortError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// CSV encoding errors
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
}

impl ComfortError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ComfortError::Config { message } => {
                format!("Configuration error: {message}. Please check your .env file and API key.")
            }
            ComfortError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            ComfortError::Io { .. } | ComfortError::Csv { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

/// Failure signal returned by a weather fetcher for a single city
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("city not found: {city}")]
    NotFound { city: String },

    #[error("rate limited by the weather API")]
    RateLimited,

    #[error("weather API rejected the API key")]
    Unauthorized,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("weather API error (cod {code}): {message}")]
    Api { code: String, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest embeds the full URL in its message; strip it so the key stays out of logs
        FetchError::Transport(err.without_url().to_string())
    }
}
