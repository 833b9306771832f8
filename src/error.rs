//! Structural input failures raised by the normalization core.
//!
//! Malformed individual samples, missing days and empty log days are not
//! errors and never show up here; they are resolved where they occur.

use thiserror::Error;

use crate::models::MetricFamily;

/// A payload that cannot be normalized at all.
#[derive(Debug, Error)]
pub enum InputShapeError {
    /// A required metric series is absent from the sensor payload.
    #[error("sensor payload is missing the {0} series")]
    MissingMetric(MetricFamily),

    /// The series exists but its sample list is not an epoch → value mapping.
    #[error("{0} samples are not an epoch to value mapping")]
    NotAMapping(MetricFamily),

    /// The watering log does not match the day/program/zone/cycle shape.
    #[error("watering log has an invalid shape: {0}")]
    Log(#[from] serde_json::Error),
}

pub type ShapeResult<T> = Result<T, InputShapeError>;
