use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::quantity::energy::KilowattHours;

/// Rate configuration does not cover the requested date.
#[derive(Debug, Error)]
#[error("no {schedule} entry is effective on or before {date}")]
pub struct ConfigurationError {
    pub schedule: &'static str,
    pub date: NaiveDate,
}

/// A caller passed values that the calculations are not defined for.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    #[error("energy must not be negative, got {0}")]
    NegativeEnergy(KilowattHours),

    #[error("billing period must end after it starts: {start} – {end}")]
    InvertedPeriod { start: NaiveDateTime, end: NaiveDateTime },
}
