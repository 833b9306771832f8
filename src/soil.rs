//! Soil and rain history: payload validation, per-metric aggregation and the
//! rainfall-anchored join.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

use crate::daily::{aggregate, Aggregation};
use crate::error::{InputShapeError, ShapeResult};
use crate::models::{DailyValue, MetricFamily, PickField, RawSample, SoilDayRecord, SoilHistory};

// ---

/// Raw samples for every metric family, validated and ordered by epoch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorHistory {
    // ---
    pub rainfall: Vec<RawSample>,
    pub soil_moisture: Vec<RawSample>,
    pub soil_analog: Vec<RawSample>,
    pub temperature: Vec<RawSample>,

    /// Entries whose epoch key was not an integer.
    pub malformed_keys: usize,
}

impl SensorHistory {
    // ---
    /// Validate a sensor history payload and pull out the four series.
    ///
    /// Accepts either the full response envelope or its `data` object.
    pub fn from_payload(payload: &Value) -> ShapeResult<Self> {
        // ---
        let data = payload.get("data").unwrap_or(payload);
        let mut history = SensorHistory::default();

        history.rainfall = history.series(
            data,
            &["rainfall", "daily", "list"],
            MetricFamily::Rainfall,
        )?;
        history.soil_moisture = history.series(
            data,
            &["soil_ch1", "soilmoisture", "list"],
            MetricFamily::SoilMoisture,
        )?;
        history.soil_analog = history.series(
            data,
            &["soil_ch1", "ad", "list"],
            MetricFamily::SoilAnalog,
        )?;
        history.temperature = history.series(
            data,
            &["outdoor", "temperature", "list"],
            MetricFamily::Temperature,
        )?;

        Ok(history)
    }

    fn series(
        &mut self,
        data: &Value,
        path: &[&str],
        family: MetricFamily,
    ) -> ShapeResult<Vec<RawSample>> {
        // ---
        let list = path
            .iter()
            .try_fold(data, |node, key| node.get(*key))
            .ok_or(InputShapeError::MissingMetric(family))?;

        let entries = list
            .as_object()
            .ok_or(InputShapeError::NotAMapping(family))?;

        let mut samples = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let Ok(epoch) = key.trim().parse::<i64>() else {
                warn!(%family, key = %key, "sample key is not an epoch, skipping");
                self.malformed_keys += 1;
                continue;
            };
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            samples.push(RawSample::new(epoch, value));
        }

        // Stable, so duplicate epochs keep payload order.
        samples.sort_by_key(|s| s.epoch);
        Ok(samples)
    }
}

/// Join per-day series into one record per rainfall day.
///
/// Days missing from a non-anchor series read as `0.0`.
pub fn join(
    rainfall: &[DailyValue],
    soil_percentage: &[DailyValue],
    soil_analog: &[DailyValue],
    temperature: &[DailyValue],
) -> Vec<SoilDayRecord> {
    // ---
    let percentage = index(soil_percentage, PickField::Percentage);
    let analog = index(soil_analog, PickField::Value);
    let temperature = index(temperature, PickField::Value);

    let lookup = |map: &BTreeMap<NaiveDate, f64>, date: &NaiveDate| {
        map.get(date).copied().unwrap_or(0.0)
    };

    rainfall
        .iter()
        .map(|rain| SoilDayRecord {
            date: rain.date,
            rainfall: rain.value,
            soil_percentage: lookup(&percentage, &rain.date),
            soil_ad: lookup(&analog, &rain.date),
            temperature: lookup(&temperature, &rain.date),
        })
        .collect()
}

fn index(series: &[DailyValue], pick: PickField) -> BTreeMap<NaiveDate, f64> {
    series.iter().map(|v| (v.date, v.reading(pick))).collect()
}

/// Aggregate every series of `history` by local day and join them.
pub fn soil_history(history: &SensorHistory, offset_hours: f64) -> SoilHistory {
    // ---
    let rainfall = aggregate(&history.rainfall, offset_hours, PickField::Value);
    let moisture = aggregate(&history.soil_moisture, offset_hours, PickField::Percentage);
    let analog = aggregate(&history.soil_analog, offset_hours, PickField::Value);
    let temperature = aggregate(&history.temperature, offset_hours, PickField::Value);

    let skipped_samples = history.malformed_keys
        + [&rainfall, &moisture, &analog, &temperature]
            .into_iter()
            .map(|a: &Aggregation| a.skipped)
            .sum::<usize>();

    let records = join(
        &rainfall.values,
        &moisture.values,
        &analog.values,
        &temperature.values,
    );

    info!(
        days = records.len(),
        skipped_samples, "soil history joined"
    );

    SoilHistory {
        records,
        skipped_samples,
    }
}
