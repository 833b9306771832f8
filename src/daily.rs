//! Max-by-day reduction of raw epoch samples.
//!
//! Samples are shifted from UTC by a fixed number of hours and grouped by
//! the resulting calendar day. Each day keeps the sample with the greatest
//! numeric reading; on a tie the first sample wins.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeDelta};
use tracing::{debug, warn};

use crate::models::{DailyValue, PickField, RawSample};

/// Hours subtracted from UTC before grouping when the caller has no better
/// value (UTC-7, the deployment's local time).
pub const DEFAULT_OFFSET_HOURS: f64 = 7.0;

/// Largest offset, in either direction, accepted for grouping.
pub const MAX_OFFSET_HOURS: f64 = 24.0;

// ---

/// Result of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    // ---
    /// One value per local day, ascending by date.
    pub values: Vec<DailyValue>,

    /// Samples dropped because their value or timestamp was unusable.
    pub skipped: usize,
}

/// Convert an hour offset into a whole-second delta.
///
/// Returns `None` for NaN, infinite, or out of range (beyond
/// ±[`MAX_OFFSET_HOURS`]) offsets.
pub fn offset_delta(offset_hours: f64) -> Option<TimeDelta> {
    // ---
    if !offset_hours.is_finite() || offset_hours.abs() > MAX_OFFSET_HOURS {
        return None;
    }
    TimeDelta::try_seconds((offset_hours * 3600.0).round() as i64)
}

/// Collapse `samples` into one [`DailyValue`] per local calendar day.
///
/// Samples are visited in slice order, so "first seen" on a tie is the
/// earlier element. Non-numeric and non-finite values are skipped, logged
/// and counted; they can never win a day.
///
/// An unusable `offset_hours` (see [`offset_delta`]) groups nothing: every
/// sample is counted as skipped.
pub fn aggregate(samples: &[RawSample], offset_hours: f64, pick: PickField) -> Aggregation {
    // ---
    let Some(offset) = offset_delta(offset_hours) else {
        warn!(offset_hours, samples = samples.len(), "invalid offset, skipping all samples");
        return Aggregation {
            values: Vec::new(),
            skipped: samples.len(),
        };
    };
    let mut max_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut skipped = 0;

    for sample in samples {
        let Some(date) = local_date(sample.epoch, offset) else {
            warn!(epoch = sample.epoch, "sample timestamp out of range, skipping");
            skipped += 1;
            continue;
        };

        let Some(reading) = parse_reading(&sample.value) else {
            warn!(
                epoch = sample.epoch,
                value = %sample.value,
                "malformed sample value, skipping"
            );
            skipped += 1;
            continue;
        };

        max_by_date
            .entry(date)
            .and_modify(|best| {
                if reading > *best {
                    *best = reading;
                }
            })
            .or_insert(reading);
    }

    debug!(
        samples = samples.len(),
        days = max_by_date.len(),
        skipped,
        "aggregated samples by day"
    );

    Aggregation {
        values: max_by_date
            .into_iter()
            .map(|(date, reading)| DailyValue::new(date, reading, pick))
            .collect(),
        skipped,
    }
}

/// Calendar day of `epoch` once shifted back by `offset`.
fn local_date(epoch: i64, offset: TimeDelta) -> Option<NaiveDate> {
    let utc = DateTime::from_timestamp(epoch, 0)?;
    utc.checked_sub_signed(offset).map(|dt| dt.date_naive())
}

fn parse_reading(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
