//! Irrigation log summarization.
//!
//! Realized cycle durations are summed per day and rounded to whole minutes;
//! days under the caller's minimum are treated as noise and dropped.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ShapeResult;
use crate::models::{LogDay, WaterLog, WateringDay, WateringHistory};

// ---

/// Parse a controller response. Accepts either the `waterLog` envelope or
/// the log object itself.
pub fn parse_water_log(payload: &Value) -> ShapeResult<WaterLog> {
    // ---
    let log = payload.get("waterLog").unwrap_or(payload);
    Ok(WaterLog::deserialize(log)?)
}

/// Total realized seconds for one log day across every program and zone.
pub fn day_seconds(day: &LogDay) -> f64 {
    // ---
    day.programs
        .iter()
        .flat_map(|p| &p.zones)
        .flat_map(|z| &z.cycles)
        .map(|c| c.real_duration.unwrap_or(0.0))
        .sum()
}

/// Sum realized run time per day and keep days of at least
/// `minimum_minutes` whole minutes.
pub fn summarize(log: &WaterLog, minimum_minutes: u32) -> WateringHistory {
    // ---
    let mut seconds_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for day in &log.days {
        *seconds_by_date.entry(day.date).or_insert(0.0) += day_seconds(day);
    }

    let minimum = f64::from(minimum_minutes);
    let days: Vec<WateringDay> = seconds_by_date
        .into_iter()
        .map(|(date, seconds)| WateringDay::new(date, (seconds / 60.0).round()))
        .filter(|day| {
            let keep = day.duration_minutes >= minimum;
            if !keep {
                debug!(
                    date = %day.date,
                    minutes = day.duration_minutes,
                    minimum_minutes,
                    "dropping short watering day"
                );
            }
            keep
        })
        .collect();

    WateringHistory::new(days)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log(value: Value) -> WaterLog {
        parse_water_log(&value).unwrap()
    }

    #[test]
    fn test_two_zones_sum_to_rounded_minutes() {
        // ---
        let log = log(json!({ "days": [{
            "date": "2025-06-01",
            "programs": [{ "zones": [
                { "cycles": [{ "realDuration": 300 }] },
                { "cycles": [{ "realDuration": 420 }] }
            ]}]
        }]}));

        let history = summarize(&log, 0);
        assert_eq!(history.days(), &[WateringDay::new(date(2025, 6, 1), 12.0)]);
    }

    #[test]
    fn test_short_day_is_dropped_not_zeroed() {
        // ---
        let log = log(json!({ "waterLog": { "days": [
            { "date": "2025-06-01", "programs": [{ "zones": [{ "cycles": [{ "realDuration": 480 }] }] }] },
            { "date": "2025-06-02", "programs": [{ "zones": [{ "cycles": [{ "realDuration": 900 }] }] }] }
        ]}}));

        let history = summarize(&log, 10);
        assert_eq!(history.len(), 1);
        assert!(history.get(date(2025, 6, 1)).is_none());
        assert_eq!(history.get(date(2025, 6, 2)).unwrap().duration_minutes, 15.0);
    }

    #[test]
    fn test_missing_durations_and_programs_are_zero() {
        // ---
        let log = log(json!({ "days": [
            { "date": "2025-06-01" },
            { "date": "2025-06-02", "programs": [{ "zones": [{ "cycles": [
                { "realDuration": null },
                {},
                { "realDuration": 60 }
            ]}]}]}
        ]}));

        assert_eq!(day_seconds(&log.days[0]), 0.0);
        let history = summarize(&log, 0);
        assert_eq!(history.len(), 2);
        assert_eq!(history.days()[0].duration_minutes, 0.0);
        assert_eq!(history.days()[1].duration_minutes, 1.0);
    }

    #[test]
    fn test_multiple_programs_and_half_minute_rounding() {
        // ---
        let log = log(json!({ "days": [{
            "date": "2025-06-03",
            "programs": [
                { "zones": [{ "cycles": [{ "realDuration": 45 }, { "realDuration": 45 }] }] },
                { "zones": [{ "cycles": [{ "realDuration": 60 }] }] }
            ]
        }]}));

        // 150 s is 2.5 minutes, rounded half away from zero
        assert_eq!(summarize(&log, 0).days()[0].duration_minutes, 3.0);
    }

    #[test]
    fn test_output_is_date_ordered_and_merged() {
        // ---
        let log = log(json!({ "days": [
            { "date": "2025-06-05", "programs": [{ "zones": [{ "cycles": [{ "realDuration": 600 }] }] }] },
            { "date": "2025-06-04", "programs": [{ "zones": [{ "cycles": [{ "realDuration": 600 }] }] }] },
            { "date": "2025-06-05", "programs": [{ "zones": [{ "cycles": [{ "realDuration": 600 }] }] }] }
        ]}));

        let history = summarize(&log, 0);
        let dates: Vec<NaiveDate> = history.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(2025, 6, 4), date(2025, 6, 5)]);
        assert_eq!(history.days()[1].duration_minutes, 20.0);
    }

    #[test]
    fn test_structurally_invalid_log_fails() {
        // ---
        assert_err!(parse_water_log(&json!({ "days": [{ "programs": [] }] })));
        assert_err!(parse_water_log(&json!({ "days": "none" })));
        assert_ok!(parse_water_log(&json!({ "days": [] })));
    }
}
