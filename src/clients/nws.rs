use anyhow::{Context, Result};
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::debug;

use super::{http_client, ForecastSource};
use crate::models::ForecastPeriod;

const BASE_URL: &str = "https://api.weather.gov";

// ---

#[derive(Debug, Deserialize)]
struct Points {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
struct PointProperties {
    forecast: String,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Vec<ForecastPeriod>,
}

/// National Weather Service forecast client for a fixed point.
#[derive(Debug, Clone)]
pub struct NwsClient {
    http: reqwest::Client,
    base_url: String,
    latitude: f64,
    longitude: f64,
    user_agent: String,
}

impl NwsClient {
    // ---
    pub fn new(latitude: f64, longitude: f64, user_agent: &str, timeout_secs: u32) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout_secs)?,
            base_url: BASE_URL.to_string(),
            latitude,
            longitude,
            user_agent: user_agent.to_string(),
        })
    }
}

impl ForecastSource for NwsClient {
    async fn forecast(&self) -> Result<Vec<ForecastPeriod>> {
        // ---
        // The gridpoint forecast URL has to be resolved from the coordinates first
        let points_url = format!("{}/points/{},{}", self.base_url, self.latitude, self.longitude);
        let points: Points = self
            .http
            .get(&points_url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .context("Failed to resolve NWS gridpoint")?
            .error_for_status()?
            .json()
            .await
            .context("Invalid NWS points response")?;

        debug!(forecast_url = %points.properties.forecast, "resolved NWS forecast URL");

        let forecast: Forecast = self
            .http
            .get(&points.properties.forecast)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .context("Failed to fetch weather forecast from NWS API")?
            .error_for_status()?
            .json()
            .await
            .context("Invalid NWS forecast response")?;

        Ok(forecast.properties.periods)
    }
}
