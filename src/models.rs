//! Data models for the watering decision pipeline.
//!
//! Everything in here is derived per run from freshly fetched payloads and
//! handed by value from one stage to the next.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---

/// A single sensor reading as delivered by the sensor history API.
///
/// `epoch` is UTC seconds; the calendar day it belongs to is only known once
/// an offset has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    // ---
    pub epoch: i64,
    pub value: String,
}

impl RawSample {
    // ---
    pub fn new(epoch: i64, value: impl Into<String>) -> Self {
        Self {
            epoch,
            value: value.into(),
        }
    }
}

/// Which field of a [`DailyValue`] the max-by-day reduction compares on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickField {
    Value,
    Percentage,
}

/// The four sensor series that make up a soil history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricFamily {
    Rainfall,
    SoilMoisture,
    SoilAnalog,
    Temperature,
}

impl fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricFamily::Rainfall => "rainfall",
            MetricFamily::SoilMoisture => "soil moisture",
            MetricFamily::SoilAnalog => "soil analog",
            MetricFamily::Temperature => "temperature",
        };
        f.write_str(name)
    }
}

/// One aggregated reading per local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyValue {
    // ---
    pub date: NaiveDate,
    pub value: f64,
    pub percentage: Option<f64>,
}

impl DailyValue {
    // ---
    pub fn new(date: NaiveDate, reading: f64, pick: PickField) -> Self {
        // ---
        match pick {
            PickField::Value => Self {
                date,
                value: reading,
                percentage: None,
            },
            PickField::Percentage => Self {
                date,
                value: 0.0,
                percentage: Some(reading),
            },
        }
    }

    /// The reading stored under `pick`. An absent percentage reads as 0.
    pub fn reading(&self, pick: PickField) -> f64 {
        match pick {
            PickField::Value => self.value,
            PickField::Percentage => self.percentage.unwrap_or(0.0),
        }
    }
}

/// Joined per-day environmental record, anchored on rainfall days.
///
/// A metric with no reading for the day is `0.0`. That zero means
/// "no reading", not "measured zero".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilDayRecord {
    // ---
    pub date: NaiveDate,
    pub rainfall: f64,
    pub soil_percentage: f64,
    pub soil_ad: f64,
    pub temperature: f64,
}

/// Joined soil history plus the number of raw samples that were dropped as
/// malformed on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SoilHistory {
    // ---
    pub records: Vec<SoilDayRecord>,
    pub skipped_samples: usize,
}

impl SoilHistory {
    // ---
    pub fn get(&self, date: NaiveDate) -> Option<&SoilDayRecord> {
        self.records.iter().find(|r| r.date == date)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SoilDayRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Actual irrigation run time on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WateringDay {
    // ---
    pub date: NaiveDate,
    pub duration_minutes: f64,
}

impl WateringDay {
    // ---
    pub fn new(date: NaiveDate, duration_minutes: f64) -> Self {
        Self {
            date,
            duration_minutes,
        }
    }

    /// Build from the controller's flat `userDuration` shape. Seconds are
    /// divided by 60 and fractional minutes are kept.
    pub fn from_user_duration(day: &UserDurationDay) -> Self {
        Self::new(day.date, day.user_duration / 60.0)
    }
}

/// Watering days in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WateringHistory {
    days: Vec<WateringDay>,
}

impl WateringHistory {
    // ---
    pub fn new(mut days: Vec<WateringDay>) -> Self {
        days.sort_by_key(|d| d.date);
        Self { days }
    }

    pub fn from_user_log(log: &UserDurationLog) -> Self {
        Self::new(log.days.iter().map(WateringDay::from_user_duration).collect())
    }

    pub fn days(&self) -> &[WateringDay] {
        &self.days
    }

    pub fn iter(&self) -> impl Iterator<Item = &WateringDay> {
        self.days.iter()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&WateringDay> {
        self.days.iter().find(|d| d.date == date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn total_minutes(&self) -> f64 {
        self.days.iter().map(|d| d.duration_minutes).sum()
    }
}

impl IntoIterator for WateringHistory {
    type Item = WateringDay;
    type IntoIter = std::vec::IntoIter<WateringDay>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.into_iter()
    }
}

// ---
// Irrigation controller payloads

/// Detailed watering log: day → program → zone → cycle.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WaterLog {
    // ---
    #[serde(default)]
    pub days: Vec<LogDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogDay {
    // ---
    pub date: NaiveDate,
    #[serde(default)]
    pub programs: Vec<LogProgram>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogProgram {
    // ---
    #[serde(default)]
    pub zones: Vec<LogZone>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogZone {
    // ---
    #[serde(default)]
    pub cycles: Vec<LogCycle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogCycle {
    // ---
    /// Seconds actually run. `null` and absent both mean 0.
    #[serde(default, rename = "realDuration")]
    pub real_duration: Option<f64>,
}

/// Flat per-day totals, as reported by the controller's summary log.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDurationLog {
    // ---
    #[serde(default)]
    pub days: Vec<UserDurationDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDurationDay {
    // ---
    pub date: NaiveDate,
    #[serde(rename = "userDuration")]
    pub user_duration: f64,
}

// ---
// Forecast payloads

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    // ---
    pub name: String,
    pub temperature: f64,
    pub temperature_unit: String,
    pub short_forecast: String,
    #[serde(default)]
    pub probability_of_precipitation: Option<Probability>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub wind_speed: Option<String>,
    #[serde(default)]
    pub wind_direction: Option<String>,
    #[serde(default)]
    pub detailed_forecast: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Probability {
    #[serde(default)]
    pub value: Option<f64>,
}

impl ForecastPeriod {
    // ---
    pub fn precipitation_percent(&self) -> Option<f64> {
        self.probability_of_precipitation
            .as_ref()
            .and_then(|p| p.value)
    }
}
