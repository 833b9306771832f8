//! Lawn watering decision agent.
//!
//! The core of this crate normalizes three independently sourced data sets
//! into date-indexed daily records:
//! - sensor history (rain, soil moisture, soil analog, temperature) is
//!   reduced to one max reading per local day and joined on rainfall days
//!   (`daily`, `soil`)
//! - the irrigation controller's nested watering log is summed per day and
//!   filtered by a minimum duration (`watering`)
//! - forecast periods are taken as delivered (`models`)
//!
//! `prompt` renders the normalized data for the decision model, `clients`
//! holds the HTTP collaborators and `pipeline` wires one complete run.

pub mod clients;
pub mod config;
pub mod daily;
pub mod dates;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod soil;
pub mod watering;

pub use config::Config;
pub use daily::{aggregate, Aggregation, DEFAULT_OFFSET_HOURS};
pub use error::InputShapeError;
pub use models::{
    DailyValue, ForecastPeriod, MetricFamily, PickField, RawSample, SoilDayRecord, SoilHistory,
    UserDurationLog, WaterLog, WateringDay, WateringHistory,
};
pub use pipeline::{run, Collaborators, Decision, RunSettings};
pub use prompt::watering_prompt;
pub use soil::{join, soil_history, SensorHistory};
pub use watering::{parse_water_log, summarize};
