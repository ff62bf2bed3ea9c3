//! Sharp cloud portal: the dashboard renders fixed-size arrays of floats per day.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use itertools::Itertools;
use rust_decimal::Decimal;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    prelude::*,
    quantity::{energy::KilowattHours, percent::Percent},
    reading::{BuySellReading, ChargeReading, EnergyReading},
    source::{
        ReadingSource,
        Request,
        portal::{Page, Portal},
    },
};

const QUARTER_HOURS_PER_DAY: u32 = 96;
const HOURS_PER_DAY: u32 = 24;

#[must_use]
pub struct SharpSource<P> {
    portal: P,
}

impl<P: Portal> SharpSource<P> {
    pub const fn new(portal: P) -> Self {
        Self { portal }
    }

    fn payload<T: DeserializeOwned>(&mut self, page: Page, date: NaiveDate) -> Result<T> {
        serde_json::from_value(self.portal.render_result(page, date)?)
            .with_context(|| format!("unexpected {} payload for {date}", page.slug()))
    }
}

impl<P: Portal> ReadingSource for SharpSource<P> {
    #[instrument(skip_all, fields(date = %request.date))]
    fn generation(&mut self, request: Request) -> Result<Vec<EnergyReading>> {
        let values: Vec<f64> = self.payload(Page::Generation, request.date)?;
        let readings = energy_readings(slots(request.date, 15, QUARTER_HOURS_PER_DAY), &values)?;
        info!(n_readings = readings.len(), "retrieved generation");
        Ok(readings)
    }

    /// Slots later than now are speculative and skipped.
    #[instrument(skip_all, fields(date = %request.date))]
    fn storage(&mut self, request: Request) -> Result<Vec<ChargeReading>> {
        let values: Vec<f64> = self.payload(Page::Storage, request.date)?;
        let slots = slots(request.date, 15, QUARTER_HOURS_PER_DAY)
            .filter(|occurred_at| *occurred_at <= request.now)
            .collect_vec();
        ensure!(
            values.len() >= slots.len(),
            "expected at least {} storage values, got {}",
            slots.len(),
            values.len(),
        );
        let readings = slots
            .into_iter()
            .zip(values)
            .map(|(occurred_at, value)| {
                Ok(ChargeReading { occurred_at, charge: Percent(to_decimal(value)?) })
            })
            .collect::<Result<Vec<_>>>()?;
        info!(n_readings = readings.len(), "retrieved storage");
        Ok(readings)
    }

    /// Hourly purchases first, then hourly sales.
    #[instrument(skip_all, fields(date = %request.date))]
    fn buy_sell(&mut self, request: Request) -> Result<Vec<BuySellReading>> {
        let payload: BuySellPayload = self.payload(Page::BuySell, request.date)?;
        let purchases = energy_readings(slots(request.date, 60, HOURS_PER_DAY), &payload.purchase)
            .context("invalid purchase series")?;
        let sales = energy_readings(slots(request.date, 60, HOURS_PER_DAY), &payload.selling)
            .context("invalid sale series")?;
        let readings = purchases
            .into_iter()
            .map(BuySellReading::Buy)
            .chain(sales.into_iter().map(BuySellReading::Sell))
            .collect_vec();
        info!(n_readings = readings.len(), "retrieved buy/sell");
        Ok(readings)
    }

    /// The portal can split consumption per device but only ever shows the whole house,
    /// which is the first series.
    #[instrument(skip_all, fields(date = %request.date))]
    fn consumption(&mut self, request: Request) -> Result<Vec<EnergyReading>> {
        let devices: Vec<Vec<f64>> = self.payload(Page::Consumption, request.date)?;
        let values = devices.first().context("the consumption payload has no series")?;
        let readings = energy_readings(slots(request.date, 15, QUARTER_HOURS_PER_DAY), values)?;
        info!(n_readings = readings.len(), "retrieved consumption");
        Ok(readings)
    }
}

#[derive(Deserialize)]
struct BuySellPayload {
    #[serde(rename = "graphDataPurchase")]
    purchase: Vec<f64>,

    #[serde(rename = "graphDataSelling")]
    selling: Vec<f64>,
}

/// Start times of `n` consecutive slots of the day.
fn slots(date: NaiveDate, minutes: i64, n: u32) -> impl ExactSizeIterator<Item = NaiveDateTime> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..n).map(move |index| midnight + TimeDelta::minutes(minutes * i64::from(index)))
}

/// Pair every slot with the next value; extra values are ignored.
fn energy_readings(
    slots: impl ExactSizeIterator<Item = NaiveDateTime>,
    values: &[f64],
) -> Result<Vec<EnergyReading>> {
    ensure!(
        values.len() >= slots.len(),
        "expected at least {} values, got {}",
        slots.len(),
        values.len(),
    );
    slots
        .zip(values)
        .map(|(occurred_at, value)| {
            Ok(EnergyReading { occurred_at, kwh: KilowattHours(to_decimal(*value)?) })
        })
        .collect()
}

/// Convert through the shortest decimal representation, so `0.1` stays `0.1`.
fn to_decimal(value: f64) -> Result<Decimal> {
    value.to_string().parse::<Decimal>().with_context(|| format!("`{value}` is not a decimal number"))
}
