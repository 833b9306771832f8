//! One full decision run: fetch, normalize, render, decide, notify.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::clients::{DecisionMaker, ForecastSource, Notifier, SensorSource, WateringSource};
use crate::config::Config;
use crate::dates::history_window;
use crate::models::{SoilHistory, WateringHistory};
use crate::prompt::watering_prompt;
use crate::soil::{soil_history, SensorHistory};
use crate::watering::summarize;

pub const NOTIFICATION_TITLE: &str = "Sprinkler Decision";

// ---

/// The knobs a run needs, independent of how they were loaded.
#[derive(Debug, Clone)]
pub struct RunSettings {
    // ---
    pub today: NaiveDate,
    pub history_days: u32,
    pub min_watering_minutes: u32,
    pub offset_hours: f64,
    pub location: String,
}

impl RunSettings {
    pub fn from_config(cfg: &Config, today: NaiveDate) -> Self {
        Self {
            today,
            history_days: cfg.history_days,
            min_watering_minutes: cfg.min_watering_minutes,
            offset_hours: cfg.offset_hours,
            location: cfg.location.clone(),
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct Decision {
    // ---
    pub watering: WateringHistory,
    pub soil: SoilHistory,
    pub prompt: String,
    pub response: String,
}

/// The external services a run depends on.
pub struct Collaborators<'a, S, W, F, D, N> {
    pub sensors: &'a S,
    pub watering: &'a W,
    pub forecast: &'a F,
    pub decision: &'a D,
    pub notifier: &'a N,
}

pub async fn run<S, W, F, D, N>(
    settings: &RunSettings,
    services: Collaborators<'_, S, W, F, D, N>,
) -> Result<Decision>
where
    S: SensorSource + Sync,
    W: WateringSource + Sync,
    F: ForecastSource + Sync,
    D: DecisionMaker + Sync,
    N: Notifier + Sync,
{
    // ---
    let (start, end) = history_window(settings.today, settings.history_days);
    info!(%start, %end, "Starting watering decision run");

    // Step 1: Fetch all three sources concurrently
    debug!("run - Step 1");
    let (forecast, water_log, payload) = tokio::try_join!(
        async {
            services
                .forecast
                .forecast()
                .await
                .context("Failed to get forecast")
        },
        async {
            services
                .watering
                .watering_log(start, settings.history_days)
                .await
                .context("Failed to get watering history")
        },
        async {
            services
                .sensors
                .sensor_history(start, end)
                .await
                .context("Failed to get sensor history")
        },
    )?;
    info!(periods = forecast.len(), "Forecast received");

    // Step 2: Normalize
    debug!("run - Step 2");
    let watering = summarize(&water_log, settings.min_watering_minutes);
    info!(days = watering.len(), "Watering history summarized");

    let sensors = SensorHistory::from_payload(&payload).context("Unusable sensor history")?;
    let soil = soil_history(&sensors, settings.offset_hours);
    if soil.skipped_samples > 0 {
        warn!(
            skipped = soil.skipped_samples,
            "Some sensor samples were malformed and skipped"
        );
    }

    // Step 3: Decide
    debug!("run - Step 3");
    let prompt = watering_prompt(&settings.location, &watering, &forecast, &soil);
    debug!("Prompt:\n{}", prompt);

    let response = services
        .decision
        .decide(&prompt)
        .await
        .context("Failed to get watering decision")?;
    info!("Decision: {}", response);

    // Step 4: Notify
    debug!("run - Step 4");
    services
        .notifier
        .notify(NOTIFICATION_TITLE, &response)
        .await
        .context("Failed to send notification")?;
    info!("Notification sent");

    Ok(Decision {
        watering,
        soil,
        prompt,
        response,
    })
}
