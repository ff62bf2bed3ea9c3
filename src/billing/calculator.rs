use std::collections::BTreeMap;

use bon::Builder;
use chrono::NaiveDate;

use crate::{
    billing::{BillingPeriod, BillingPeriodStats, BillingPeriods, BillingReport, DailyData},
    prelude::*,
    quantity::cost::Cost,
    rates::Rates,
    store::{Category, ReadingStore},
};

/// Derives the billing statistics from the readings and the rate schedules.
///
/// Nothing is cached: every call re-reads the store.
#[derive(Builder)]
pub struct BillingCalculator<'a, S> {
    store: &'a S,
    rates: &'a Rates,
    first_period_start: NaiveDate,

    /// Only the periods that were over before this date are reported.
    today: NaiveDate,

    /// Also report the period that is still running on `today`.
    #[builder(default)]
    include_current: bool,

    /// Decimal places of the smallest currency subunit.
    #[builder(default = 2)]
    currency_decimals: u32,
}

impl<S: ReadingStore> BillingCalculator<'_, S> {
    pub const fn periods(&self) -> BillingPeriods {
        BillingPeriods::new(self.first_period_start, self.today).including_current(self.include_current)
    }

    /// Statistics of every period, oldest first.
    #[instrument(skip_all, fields(first_period_start = %self.first_period_start, today = %self.today))]
    pub fn stats_for_all_periods(&self) -> Result<Vec<BillingPeriodStats>> {
        let stats = self.periods().map(|period| self.stats_for(period)).collect::<Result<Vec<_>>>()?;
        info!(n_periods = stats.len(), "calculated");
        Ok(stats)
    }

    pub fn report(&self) -> Result<BillingReport> {
        Ok(self.stats_for_all_periods()?.into_iter().collect())
    }

    #[instrument(skip_all, fields(period = ?period))]
    pub fn stats_for(&self, period: BillingPeriod) -> Result<BillingPeriodStats> {
        let (daily_data, has_readings) = self.daily_data(period)?;
        let totals = daily_data.values().copied().sum::<DailyData>().normalize();

        let (total_cost, actual_cost, sold_price) = if has_readings {
            // The rates in force at the period start apply to the whole period:
            let rates = self.rates.on(period.start_date())?;
            (
                rates.retail_cost(totals.consumption)?,
                rates.retail_cost(totals.bought)?,
                rates.feed_in_price(totals.sold),
            )
        } else {
            debug!("no readings");
            (Cost::ZERO, Cost::ZERO, Cost::ZERO)
        };
        let total_cost = self.round(total_cost)?;
        let actual_cost = self.round(actual_cost)?;
        let sold_price = self.round(sold_price)?;
        let generation_savings = self.round(total_cost - actual_cost)?;
        let total_savings = self.round(generation_savings + sold_price)?;

        debug!(?total_cost, ?actual_cost, ?sold_price, ?total_savings, "calculated");
        Ok(BillingPeriodStats {
            period,
            total_consumption: totals.consumption,
            total_generation: totals.generation,
            total_bought: totals.bought,
            total_sold: totals.sold,
            total_cost,
            actual_cost,
            sold_price,
            generation_savings,
            total_savings,
            daily_data,
        })
    }

    /// Zero-filled daily breakdown, and whether there was any reading at all.
    fn daily_data(&self, period: BillingPeriod) -> Result<(BTreeMap<NaiveDate, DailyData>, bool)> {
        let mut daily_data: BTreeMap<NaiveDate, DailyData> =
            period.dates().map(|date| (date, DailyData::default())).collect();
        let mut has_readings = false;
        for category in Category::ALL {
            for (date, energy) in self.store.series_kwh(category, period)? {
                has_readings = true;
                *daily_data.entry(date).or_default().get_mut(category) += energy;
            }
        }
        daily_data.values_mut().for_each(|day| *day = day.normalize());
        Ok((daily_data, has_readings))
    }

    fn round(&self, cost: Cost) -> Result<Cost> {
        cost.round_to_nearest_five(self.currency_decimals)
    }
}
