use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::{http_client, SensorSource};

const BASE_URL: &str = "https://api.ecowitt.net/api/v3";
const HISTORY_CALL_BACK: &str = "outdoor,rainfall,soil_ch1";

// ---

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EcowittDevice {
    // ---
    pub id: i64,
    pub name: String,
    pub mac: String,
}

#[derive(Debug, Deserialize)]
struct DeviceList {
    #[serde(default)]
    list: Vec<EcowittDevice>,
}

/// Every response is wrapped as `{ code, msg, data }`; `code` 0 is success.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_data(self, what: &str) -> Result<T> {
        // ---
        if self.code != 0 {
            return Err(anyhow!(
                "Ecowitt {} request failed with code {}: {}",
                what,
                self.code,
                self.msg
            ));
        }
        self.data
            .ok_or_else(|| anyhow!("Ecowitt {} response has no data", what))
    }
}

/// Client for the Ecowitt cloud API (soil, rain and outdoor sensors).
#[derive(Debug, Clone)]
pub struct EcowittClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    application_key: String,
}

impl EcowittClient {
    // ---
    pub fn new(api_key: &str, application_key: &str, timeout_secs: u32) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout_secs)?,
            base_url: BASE_URL.to_string(),
            api_key: api_key.to_string(),
            application_key: application_key.to_string(),
        })
    }

    /// Devices registered to the account.
    pub async fn devices(&self) -> Result<Vec<EcowittDevice>> {
        // ---
        let url = format!("{}/device/list", self.base_url);
        let envelope: Envelope<DeviceList> = self
            .http
            .get(&url)
            .query(&[
                ("application_key", self.application_key.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Failed to fetch devices from Ecowitt API")?
            .error_for_status()?
            .json()
            .await
            .context("Invalid Ecowitt device list response")?;

        Ok(envelope.into_data("device list")?.list)
    }

    /// Raw history payload for `mac` between `start` and `end`.
    pub async fn device_history(
        &self,
        mac: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Value> {
        // ---
        let url = format!("{}/device/history", self.base_url);
        let start_date = start.format("%Y-%m-%d").to_string();
        let end_date = end.format("%Y-%m-%d").to_string();

        debug!(mac, %start_date, %end_date, "fetching Ecowitt history");

        let envelope: Envelope<Value> = self
            .http
            .get(&url)
            .query(&[
                ("application_key", self.application_key.as_str()),
                ("api_key", self.api_key.as_str()),
                ("mac", mac),
                ("start_date", start_date.as_str()),
                ("end_date", end_date.as_str()),
                ("call_back", HISTORY_CALL_BACK),
            ])
            .send()
            .await
            .context("Failed to fetch device history from Ecowitt API")?
            .error_for_status()?
            .json()
            .await
            .context("Invalid Ecowitt history response")?;

        envelope.into_data("history")
    }
}

impl SensorSource for EcowittClient {
    async fn sensor_history(&self, start: NaiveDate, end: NaiveDate) -> Result<Value> {
        // ---
        let devices = self.devices().await?;
        let device = devices
            .first()
            .ok_or_else(|| anyhow!("No Ecowitt devices registered to this account"))?;

        info!(device = %device.name, mac = %device.mac, "fetching sensor history");
        self.device_history(&device.mac, start, end).await
    }
}
