//! Environment-driven process configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with required tokens and tuned defaults

use std::fmt::Display;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Runtime configuration, loaded once at startup.
///
/// `TELEGRAM_TOKEN` and `TMDB_API_KEY` are required; everything else has a
/// sensible default. Values come from the process environment, optionally
/// seeded from a `.env` file by the binary before this is called.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot API token.
    pub telegram_token: String,
    /// TMDB API key for the metadata gateway.
    pub tmdb_api_key: String,
    /// Path of the sqlite database file.
    pub database_path: String,
    /// Default log filter when RUST_LOG is not set.
    pub log_level: String,
    /// UTC hour (0-23) at which the daily notification run fires.
    pub notify_hour_utc: u32,
    /// How many days ahead of today a release counts as "imminent".
    pub notify_lookahead_days: u32,
    /// Timeout applied to every metadata provider request, in seconds.
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let telegram_token = std::env::var("TELEGRAM_TOKEN")
            .context("TELEGRAM_TOKEN environment variable must be set")?;
        let tmdb_api_key = std::env::var("TMDB_API_KEY")
            .context("TMDB_API_KEY environment variable must be set")?;

        let config = Config {
            telegram_token,
            tmdb_api_key,
            database_path: env_or("DATABASE_PATH", "marquee.db"),
            log_level: env_or("LOG_LEVEL", "info"),
            notify_hour_utc: parsed_env("NOTIFY_HOUR_UTC", 9)?,
            notify_lookahead_days: parsed_env("NOTIFY_LOOKAHEAD_DAYS", 3)?,
            request_timeout_secs: parsed_env("REQUEST_TIMEOUT_SECS", 10)?,
        };

        if config.notify_hour_utc > 23 {
            bail!(
                "NOTIFY_HOUR_UTC must be between 0 and 23, got {}",
                config.notify_hour_utc
            );
        }

        Ok(config)
    }
}

/// Read an environment variable, falling back to a default when unset or empty.
fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

/// Read and parse an environment variable, falling back to a default when unset.
fn parsed_env<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{name} is not a valid value: {e}")),
        _ => Ok(default),
    }
}
