use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    billing::BillingPeriod,
    quantity::{cost::Cost, energy::KilowattHours},
    store::Category,
};

/// Unrounded energy totals of a single day.
#[must_use]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct DailyData {
    pub generation: KilowattHours,
    pub consumption: KilowattHours,
    pub bought: KilowattHours,
    pub sold: KilowattHours,
}

impl DailyData {
    pub fn get_mut(&mut self, category: Category) -> &mut KilowattHours {
        match category {
            Category::Generation => &mut self.generation,
            Category::Consumption => &mut self.consumption,
            Category::Purchase => &mut self.bought,
            Category::Sale => &mut self.sold,
        }
    }

    /// Stored sums come back with three decimal places and the zero fill has none.
    pub fn normalize(self) -> Self {
        Self {
            generation: self.generation.normalize(),
            consumption: self.consumption.normalize(),
            bought: self.bought.normalize(),
            sold: self.sold.normalize(),
        }
    }
}

impl std::iter::Sum for DailyData {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |total, day| Self {
            generation: total.generation + day.generation,
            consumption: total.consumption + day.consumption,
            bought: total.bought + day.bought,
            sold: total.sold + day.sold,
        })
    }
}

/// Energy totals and money figures of one billing period.
///
/// Money figures are rounded, the daily breakdown is not.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct BillingPeriodStats {
    #[serde(flatten)]
    pub period: BillingPeriod,

    pub total_consumption: KilowattHours,
    pub total_generation: KilowattHours,
    pub total_bought: KilowattHours,
    pub total_sold: KilowattHours,

    /// Had all the consumption been bought at retail.
    pub total_cost: Cost,

    /// Retail cost of the energy actually bought from the grid.
    pub actual_cost: Cost,

    pub sold_price: Cost,
    pub generation_savings: Cost,
    pub total_savings: Cost,

    pub daily_data: BTreeMap<NaiveDate, DailyData>,
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct BillingReport {
    pub periods: Vec<BillingPeriodStats>,
    pub lifetime_savings: Cost,
}

impl FromIterator<BillingPeriodStats> for BillingReport {
    fn from_iter<T: IntoIterator<Item = BillingPeriodStats>>(iter: T) -> Self {
        let periods: Vec<_> = iter.into_iter().collect();
        let lifetime_savings = periods.iter().map(|stats| stats.total_savings).sum();
        Self { periods, lifetime_savings }
    }
}
