use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use weather_comfort::{
    AppConfig, CsvRecordWriter, InvalidReadingPolicy, OpenWeatherClient, Orchestrator,
    RunSummary, logging,
};

/// Exit code when the records could not be written
const EXIT_WRITE_FAILED: u8 = 2;

/// Fetch current weather for a list of cities and append a comfort index to a CSV file
#[derive(Debug, Parser)]
#[command(name = "weather-comfort", version, about)]
struct Cli {
    /// City to query, e.g. "Tokyo, JP". Repeat to query several; replaces the configured list
    #[arg(long = "city", value_name = "CITY")]
    cities: Vec<String>,

    /// CSV file to append to
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// What to do with readings that fail validation: sentinel or skip
    #[arg(long, value_name = "POLICY")]
    on_invalid: Option<InvalidReadingPolicy>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> weather_comfort::Result<AppConfig> {
    let mut config = AppConfig::from_env()?;

    if !cli.cities.is_empty() {
        config.cities = cli.cities.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    if let Some(policy) = cli.on_invalid {
        config.output.on_invalid = policy;
    }

    config.validate()?;
    Ok(config)
}

async fn run(config: &AppConfig) -> Result<RunSummary> {
    let fetcher =
        OpenWeatherClient::new(&config.weather).context("Failed to initialize weather client")?;
    let sink = CsvRecordWriter::new(&config.output.path);

    let mut orchestrator = Orchestrator::new(config, fetcher, sink);
    Ok(orchestrator.run().await)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // A missing .env file is fine; the environment may already carry the key
    let dotenv = dotenvy::dotenv();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.logging, cli.verbose);
    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {}", e),
    }
    debug!(
        "Writing to {} for {} cities",
        config.output.path.display(),
        config.cities.len()
    );

    match run(&config).await {
        Ok(summary) => {
            print!("{summary}");
            if summary.write_succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_WRITE_FAILED)
            }
        }
        Err(e) => {
            error!("An error occurred: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_repeated_cities() {
        let cli = Cli::parse_from([
            "weather-comfort",
            "--city",
            "Tokyo, JP",
            "--city",
            "London, UK",
            "--on-invalid",
            "skip",
            "-o",
            "out.csv",
        ]);
        assert_eq!(cli.cities, vec!["Tokyo, JP", "London, UK"]);
        assert_eq!(cli.on_invalid, Some(InvalidReadingPolicy::SkipRecord));
        assert_eq!(cli.output, Some(PathBuf::from("out.csv")));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_rejects_unknown_policy() {
        let result = Cli::try_parse_from(["weather-comfort", "--on-invalid", "drop"]);
        assert!(result.is_err());
    }
}
