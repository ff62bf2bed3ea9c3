//! At-a-glance figures for the current day.

use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use itertools::Itertools;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::{
    db::Db,
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours, percent::Percent, rate::KilowattHourRate},
    rates::Rates,
    store::{Category, ReadingStore},
};

/// Recent charge readings may still be missing from the portal, so the latest one is taken
/// from at least this long ago.
const CHARGE_DELAY: TimeDelta = TimeDelta::minutes(30);

/// Energy to brew a cup of coffee.
const WATT_HOURS_PER_COFFEE_CUP: Decimal = dec!(20.667);

/// Tesla Model 3, combined mild weather.
const WATT_HOURS_PER_TESLA_KM: Decimal = dec!(129.0);

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub bought: KilowattHours,
    pub sold: Sold,
    pub generation: Days,
    pub consumption: Days,
    pub batteries: Vec<BatterySummary>,

    /// Rounded to whole kilowatt-hours.
    pub all_time_generation: KilowattHours,

    pub factoids: Factoids,
}

#[must_use]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct Sold {
    pub kwh: KilowattHours,
    pub feed_in_tariff: KilowattHourRate,
    pub price: Cost,
}

#[must_use]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct Days {
    pub yesterday: KilowattHours,
    pub today: KilowattHours,
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct BatterySummary {
    pub name: String,
    pub capacity: KilowattHours,

    /// Zero when nothing is recorded yet.
    pub charge: Percent,
}

/// What the all-time generation is worth in everyday terms, rounded to whole numbers.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Factoids {
    pub coffee_cups: Decimal,
    pub tesla_km: Decimal,
}

impl Factoids {
    pub fn new(energy: KilowattHours) -> Self {
        let watt_hours = energy.to_watt_hours();
        Self {
            coffee_cups: (watt_hours / WATT_HOURS_PER_COFFEE_CUP).round(),
            tesla_km: (watt_hours / WATT_HOURS_PER_TESLA_KM).round(),
        }
    }
}

impl Dashboard {
    #[instrument(skip_all, fields(now = %now))]
    pub fn query(db: &Db, rates: &Rates, now: NaiveDateTime) -> Result<Self> {
        let today = now.date();
        let yesterday = today.pred_opt().context("date underflow")?;

        let sold = db.sum_kwh(Category::Sale, today)?;
        let feed_in_tariff = rates.feed_in_tariff.resolve(today)?.0;

        let batteries: Vec<BatterySummary> = db
            .batteries()
            .all()?
            .into_iter()
            .map(|battery| {
                let charge = db
                    .charge_readings()
                    .last_before(battery.id, now - CHARGE_DELAY)?
                    .unwrap_or(Percent::ZERO);
                Ok(BatterySummary { name: battery.name, capacity: battery.capacity, charge })
            })
            .collect::<Result<_>>()?;

        let all_time_generation = db.energy_readings(Category::Generation).total()?;

        Ok(Self {
            date: today,
            bought: db.sum_kwh(Category::Purchase, today)?,
            sold: Sold { kwh: sold, feed_in_tariff, price: sold * feed_in_tariff },
            generation: Days {
                yesterday: db.sum_kwh(Category::Generation, yesterday)?,
                today: db.sum_kwh(Category::Generation, today)?,
            },
            consumption: Days {
                yesterday: db.sum_kwh(Category::Consumption, yesterday)?,
                today: db.sum_kwh(Category::Consumption, today)?,
            },
            batteries,
            all_time_generation: KilowattHours(all_time_generation.0.round()),
            factoids: Factoids::new(all_time_generation),
        })
    }
}

/// Quarter-hourly generation of yesterday, today, and the same day a year ago.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct GenerationChart {
    /// One label per quarter of an hour, only the full hours are labelled.
    pub labels: Vec<String>,

    pub yesterday: Series,

    /// Ends at the current time.
    pub today: Series,

    pub last_year_today: Series,
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct Series {
    pub label: &'static str,
    pub data: Vec<KilowattHours>,
}

impl GenerationChart {
    #[instrument(skip_all, fields(now = %now))]
    pub fn query(db: &Db, now: NaiveDateTime) -> Result<Self> {
        let today = now.date();
        let yesterday = today.pred_opt().context("date underflow")?;
        let last_year_today =
            today.checked_sub_months(Months::new(12)).context("date underflow")?;

        let mut today_data = Self::series(db, today)?;
        today_data.retain(|(occurred_at, _)| *occurred_at <= now);

        Ok(Self {
            labels: Self::labels(),
            yesterday: Series { label: "Yesterday", data: Self::values(Self::series(db, yesterday)?) },
            today: Series { label: "Today", data: Self::values(today_data) },
            last_year_today: Series {
                label: "One Year Ago Today",
                data: Self::values(Self::series(db, last_year_today)?),
            },
        })
    }

    fn labels() -> Vec<String> {
        (0..24)
            .flat_map(|hour: u32| [hour.to_string(), String::new(), String::new(), String::new()])
            .collect()
    }

    fn series(db: &Db, date: NaiveDate) -> Result<Vec<(NaiveDateTime, KilowattHours)>> {
        let since = date.and_time(NaiveTime::MIN);
        let until = date.succ_opt().context("date overflow")?.and_time(NaiveTime::MIN);
        Ok(db
            .energy_readings(Category::Generation)
            .series_between(since, until)?
            .into_iter()
            .map(|reading| (reading.occurred_at, reading.kwh))
            .collect())
    }

    fn values(series: Vec<(NaiveDateTime, KilowattHours)>) -> Vec<KilowattHours> {
        series.into_iter().map(|(_, kwh)| kwh).collect_vec()
    }
}
