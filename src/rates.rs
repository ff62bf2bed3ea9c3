pub mod schedule;
pub mod tariff;

use chrono::NaiveDate;
use serde::Deserialize;

pub use self::{
    schedule::{FeedInTariff, FuelAdjustment, RenewableCharge, Schedule},
    tariff::{TariffTable, Tier},
};
use crate::{
    error::{ConfigurationError, InvalidInputError},
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

/// All versioned rate schedules.
#[must_use]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Rates {
    pub tariff: Schedule<TariffTable>,

    #[serde(default)]
    pub fuel_adjustment: Schedule<FuelAdjustment>,

    #[serde(default)]
    pub renewable_charge: Schedule<RenewableCharge>,

    #[serde(default)]
    pub feed_in_tariff: Schedule<FeedInTariff>,
}

impl Rates {
    /// Resolve every schedule for the same date.
    pub fn on(&self, date: NaiveDate) -> Result<EffectiveRates<'_>, ConfigurationError> {
        Ok(EffectiveRates {
            tariff: self.tariff.resolve(date)?,
            fuel_adjustment: self.fuel_adjustment.resolve(date)?.0,
            renewable_charge: self.renewable_charge.resolve(date)?.0,
            feed_in_tariff: self.feed_in_tariff.resolve(date)?.0,
        })
    }
}

/// Rates in force on a particular date.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct EffectiveRates<'a> {
    pub tariff: &'a TariffTable,
    pub fuel_adjustment: KilowattHourRate,
    pub renewable_charge: KilowattHourRate,
    pub feed_in_tariff: KilowattHourRate,
}

impl EffectiveRates<'_> {
    /// Retail price of the energy: tiered cost plus the flat per-kWh surcharges.
    pub fn retail_cost(&self, energy: KilowattHours) -> Result<Cost, InvalidInputError> {
        Ok(self.tariff.cost(energy)?
            + energy * self.fuel_adjustment
            + energy * self.renewable_charge)
    }

    #[must_use]
    pub fn feed_in_price(&self, energy: KilowattHours) -> Cost {
        energy * self.feed_in_tariff
    }
}
