//! Configuration loader for the `sprinkler-agent` binary.
//!
//! All runtime settings and their defaults live here and are read from
//! environment variables (the caller loads an optional `.env` first), so no
//! other module reaches for `env::var` directly.
//!
use std::env;

use anyhow::{anyhow, Result};

use crate::daily::{offset_delta, DEFAULT_OFFSET_HOURS, MAX_OFFSET_HOURS};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional floating point environment variable with a default value.
macro_rules! parse_env_f64 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<f64>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Read an optional string environment variable with a default value.
macro_rules! env_or {
    ($var_name:expr, $default:expr) => {
        env::var($var_name).unwrap_or_else(|_| $default.to_string())
    };
}

pub const DEFAULT_RAIN_MACHINE_URL: &str = "https://192.168.86.31:8080";
pub const DEFAULT_LOCATION: &str = "Farmington, Utah";
pub const DEFAULT_USER_AGENT: &str = "Sprinkler Agent (sprinkler-agent@localhost)";

/// Strongly typed application configuration.
///
/// All fields are immutable after loading.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    pub ecowitt_api_key: String,
    pub ecowitt_application_key: String,

    /// Base URL of the irrigation controller on the local network.
    pub rain_machine_url: String,
    pub rain_machine_password: String,

    pub google_api_key: String,
    pub google_model: String,

    pub pushbullet_api_key: String,

    /// Days of history requested from the sensor and irrigation APIs.
    pub history_days: u32,

    /// Watering days shorter than this are ignored.
    pub min_watering_minutes: u32,

    /// Hours subtracted from UTC sensor timestamps before grouping by day.
    pub offset_hours: f64,

    pub forecast_latitude: f64,
    pub forecast_longitude: f64,

    /// Free text location used in the decision prompt.
    pub location: String,

    /// `User-Agent` sent to the forecast API, which rejects anonymous calls.
    pub user_agent: String,

    pub http_timeout_secs: u32,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `ECOWITT_API_KEY`, `ECOWITT_APPLICATION_KEY`
/// - `RAIN_MACHINE_PASSWORD`
/// - `GOOGLE_API_KEY`, `GOOGLE_MODEL`
/// - `PUSH_BULLET_API_KEY`
///
/// Optional:
/// - `RAIN_MACHINE_URL` (default: `https://192.168.86.31:8080`)
/// - `HISTORY_DAYS` (default: 7)
/// - `MIN_WATERING_MINUTES` (default: 100)
/// - `SENSOR_OFFSET_HOURS` (default: 7)
/// - `FORECAST_LATITUDE` / `FORECAST_LONGITUDE` (default: Farmington, UT)
/// - `LAWN_LOCATION`, `NWS_USER_AGENT`
/// - `HTTP_TIMEOUT_SECS` (default: 30)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let ecowitt_api_key = require_env!("ECOWITT_API_KEY");
    let ecowitt_application_key = require_env!("ECOWITT_APPLICATION_KEY");
    let rain_machine_password = require_env!("RAIN_MACHINE_PASSWORD");
    let google_api_key = require_env!("GOOGLE_API_KEY");
    let google_model = require_env!("GOOGLE_MODEL");
    let pushbullet_api_key = require_env!("PUSH_BULLET_API_KEY");

    let rain_machine_url = env_or!("RAIN_MACHINE_URL", DEFAULT_RAIN_MACHINE_URL);
    let history_days = parse_env_u32!("HISTORY_DAYS", 7);
    let min_watering_minutes = parse_env_u32!("MIN_WATERING_MINUTES", 100);
    let offset_hours = parse_env_f64!("SENSOR_OFFSET_HOURS", DEFAULT_OFFSET_HOURS);
    let forecast_latitude = parse_env_f64!("FORECAST_LATITUDE", 40.58017);
    let forecast_longitude = parse_env_f64!("FORECAST_LONGITUDE", -111.54253);
    let location = env_or!("LAWN_LOCATION", DEFAULT_LOCATION);
    let user_agent = env_or!("NWS_USER_AGENT", DEFAULT_USER_AGENT);
    let http_timeout_secs = parse_env_u32!("HTTP_TIMEOUT_SECS", 30);

    if history_days == 0 {
        return Err(anyhow!("HISTORY_DAYS must be at least 1"));
    }
    check_offset(offset_hours)?;

    Ok(Config {
        ecowitt_api_key,
        ecowitt_application_key,
        rain_machine_url,
        rain_machine_password,
        google_api_key,
        google_model,
        pushbullet_api_key,
        history_days,
        min_watering_minutes,
        offset_hours,
        forecast_latitude,
        forecast_longitude,
        location,
        user_agent,
        http_timeout_secs,
    })
}

/// Reject offsets the aggregator cannot group with.
fn check_offset(offset_hours: f64) -> Result<()> {
    // ---
    if offset_delta(offset_hours).is_none() {
        return Err(anyhow!(
            "SENSOR_OFFSET_HOURS must be a finite number within ±{} (got {})",
            MAX_OFFSET_HOURS,
            offset_hours
        ));
    }
    Ok(())
}

/// Keep the first and last two characters of a secret.
fn mask(secret: &str) -> String {
    // ---
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 6 {
        return "****".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}****{tail}")
}

impl Config {
    /// Log the loaded configuration, masking credentials.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  ECOWITT_API_KEY         : {}", mask(&self.ecowitt_api_key));
        tracing::info!("  ECOWITT_APPLICATION_KEY : {}", mask(&self.ecowitt_application_key));
        tracing::info!("  RAIN_MACHINE_URL        : {}", self.rain_machine_url);
        tracing::info!("  RAIN_MACHINE_PASSWORD   : {}", mask(&self.rain_machine_password));
        tracing::info!("  GOOGLE_API_KEY          : {}", mask(&self.google_api_key));
        tracing::info!("  GOOGLE_MODEL            : {}", self.google_model);
        tracing::info!("  PUSH_BULLET_API_KEY     : {}", mask(&self.pushbullet_api_key));
        tracing::info!("  HISTORY_DAYS            : {}", self.history_days);
        tracing::info!("  MIN_WATERING_MINUTES    : {}", self.min_watering_minutes);
        tracing::info!("  SENSOR_OFFSET_HOURS     : {}", self.offset_hours);
        tracing::info!(
            "  FORECAST_LAT/LON        : {},{}",
            self.forecast_latitude,
            self.forecast_longitude
        );
        tracing::info!("  LAWN_LOCATION           : {}", self.location);
        tracing::info!("  NWS_USER_AGENT          : {}", self.user_agent);
        tracing::info!("  HTTP_TIMEOUT_SECS       : {}", self.http_timeout_secs);
    }
}
