use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::WateringSource;
use crate::models::WaterLog;
use crate::watering::parse_water_log;

// ---

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// Client for a RainMachine irrigation controller on the local network.
///
/// The controller serves a self-signed certificate, so certificate
/// validation is disabled for this client only.
#[derive(Debug, Clone)]
pub struct RainMachineClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl RainMachineClient {
    // ---
    /// Authenticate against the controller and keep the access token.
    pub async fn login(base_url: &str, password: &str, timeout_secs: u32) -> Result<Self> {
        // ---
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(std::time::Duration::from_secs(u64::from(timeout_secs)))
            .build()
            .context("Failed to build RainMachine HTTP client")?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let response = http
            .post(format!("{base_url}/api/4/auth/login"))
            .json(&json!({ "pwd": password, "remember": 1 }))
            .send()
            .await
            .context("Failed to authenticate with RainMachine API")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "RainMachine authentication failed: {}",
                response.status()
            ));
        }

        let login: LoginResponse = response
            .json()
            .await
            .context("Invalid RainMachine login response")?;

        info!("Authenticated with RainMachine API");
        Ok(Self {
            http,
            base_url,
            access_token: login.access_token,
        })
    }

    async fn get(&self, endpoint: &str) -> Result<Value> {
        // ---
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "RainMachine GET");

        self.http
            .get(&url)
            .query(&[("access_token", self.access_token.as_str())])
            .send()
            .await
            .with_context(|| format!("RainMachine request to {endpoint} failed"))?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("Invalid RainMachine response from {endpoint}"))
    }
}

impl WateringSource for RainMachineClient {
    async fn watering_log(&self, start: NaiveDate, days: u32) -> Result<WaterLog> {
        // ---
        let endpoint = format!(
            "/api/4/watering/log/details/{}/{}",
            start.format("%Y-%m-%d"),
            days
        );
        let payload = self.get(&endpoint).await?;
        Ok(parse_water_log(&payload)?)
    }
}
