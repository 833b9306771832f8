//! Thin HTTP clients for the services the pipeline talks to.
//!
//! Each client sits behind a one-method trait so the pipeline can be driven
//! by fakes in tests. The clients only move bytes; all normalization happens
//! in the core modules.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;

use crate::models::{ForecastPeriod, WaterLog};

mod ecowitt;
mod gemini;
mod nws;
mod pushbullet;
mod rainmachine;

pub use ecowitt::{EcowittClient, EcowittDevice};
pub use gemini::GeminiClient;
pub use nws::NwsClient;
pub use pushbullet::PushbulletClient;
pub use rainmachine::RainMachineClient;

// ---

/// Source of raw soil, rain and temperature history.
pub trait SensorSource {
    /// Raw history payload covering `start..=end`.
    fn sensor_history(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Value>> + Send;
}

/// Source of the irrigation controller's detailed watering log.
pub trait WateringSource {
    fn watering_log(&self, start: NaiveDate, days: u32)
        -> impl Future<Output = Result<WaterLog>> + Send;
}

pub trait ForecastSource {
    fn forecast(&self) -> impl Future<Output = Result<Vec<ForecastPeriod>>> + Send;
}

/// Language model that turns a prompt into a watering decision.
pub trait DecisionMaker {
    fn decide(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

pub trait Notifier {
    fn notify(&self, title: &str, body: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Shared `reqwest` client builder with the configured request timeout.
pub(crate) fn http_client(timeout_secs: u32) -> Result<reqwest::Client> {
    // ---
    reqwest::Client::builder()
        .timeout(Duration::from_secs(u64::from(timeout_secs)))
        .build()
        .context("Failed to build HTTP client")
}
