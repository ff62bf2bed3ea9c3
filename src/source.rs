pub mod portal;
pub mod sharp;

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::{
    prelude::*,
    reading::{BuySellReading, ChargeReading, EnergyReading},
    source::{portal::DumpDirectory, sharp::SharpSource},
};

/// What to retrieve: the day and the current time.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Request {
    pub date: NaiveDate,

    /// Readings that are not due yet are ignored where the vendor reports them.
    pub now: NaiveDateTime,
}

impl Request {
    /// Request for `date`, or for today when not specified.
    pub fn new(date: Option<NaiveDate>, now: NaiveDateTime) -> Self {
        Self { date: date.unwrap_or_else(|| now.date()), now }
    }
}

/// Vendor-specific retrieval of the readings.
pub trait ReadingSource {
    fn generation(&mut self, request: Request) -> Result<Vec<EnergyReading>>;

    fn storage(&mut self, request: Request) -> Result<Vec<ChargeReading>>;

    fn buy_sell(&mut self, request: Request) -> Result<Vec<BuySellReading>>;

    fn consumption(&mut self, request: Request) -> Result<Vec<EnergyReading>>;
}

/// `[source]` configuration table, `vendor` selects the implementation.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "vendor", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Sharp cloud portal, with the dashboard payloads captured into a directory.
    Sharp { dump_dir: PathBuf },
}

impl SourceConfig {
    #[must_use]
    pub fn build(&self) -> Box<dyn ReadingSource> {
        match self {
            Self::Sharp { dump_dir } => Box::new(SharpSource::new(DumpDirectory::new(dump_dir))),
        }
    }
}
