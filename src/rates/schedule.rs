use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigurationError, quantity::rate::KilowattHourRate};

/// Something that changes over time and is configured as a [`Schedule`].
pub trait Versioned {
    /// Human-readable schedule name for error messages.
    const SCHEDULE: &'static str;
}

/// Values keyed by the date they become effective.
///
/// An entry stays in force from its effective date (inclusive) until the next entry.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule<T>(BTreeMap<NaiveDate, T>);

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T> FromIterator<(NaiveDate, T)> for Schedule<T> {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Versioned> Schedule<T> {
    /// Select the entry with the greatest effective date not after `on`.
    pub fn resolve(&self, on: NaiveDate) -> Result<&T, ConfigurationError> {
        self.0
            .range(..=on)
            .next_back()
            .map(|(_, value)| value)
            .ok_or(ConfigurationError { schedule: T::SCHEDULE, date: on })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Serialize, Deserialize, derive_more::From, derive_more::Into)]
#[serde(transparent)]
pub struct FuelAdjustment(pub KilowattHourRate);

impl Versioned for FuelAdjustment {
    const SCHEDULE: &'static str = "fuel adjustment";
}

/// Renewable energy surcharge.
#[must_use]
#[derive(Copy, Clone, Debug, Serialize, Deserialize, derive_more::From, derive_more::Into)]
#[serde(transparent)]
pub struct RenewableCharge(pub KilowattHourRate);

impl Versioned for RenewableCharge {
    const SCHEDULE: &'static str = "renewable charge";
}

/// Flat price paid for energy sold back to the grid.
#[must_use]
#[derive(Copy, Clone, Debug, Serialize, Deserialize, derive_more::From, derive_more::Into)]
#[serde(transparent)]
pub struct FeedInTariff(pub KilowattHourRate);

impl Versioned for FeedInTariff {
    const SCHEDULE: &'static str = "feed-in tariff";
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn schedule() -> Schedule<FuelAdjustment> {
        [
            (date(2023, 1, 1), FuelAdjustment(KilowattHourRate(dec!(1.00)))),
            (date(2023, 6, 1), FuelAdjustment(KilowattHourRate(dec!(-2.50)))),
            (date(2024, 1, 1), FuelAdjustment(KilowattHourRate(dec!(0.75)))),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_resolve_exact_date() -> crate::prelude::Result {
        assert_eq!(schedule().resolve(date(2023, 6, 1))?.0, KilowattHourRate(dec!(-2.50)));
        Ok(())
    }

    #[test]
    fn test_resolve_between_entries() -> crate::prelude::Result {
        let schedule = schedule();
        assert_eq!(schedule.resolve(date(2023, 6, 2))?.0, KilowattHourRate(dec!(-2.50)));
        assert_eq!(schedule.resolve(date(2023, 12, 31))?.0, KilowattHourRate(dec!(-2.50)));
        assert_eq!(schedule.resolve(date(2023, 5, 31))?.0, KilowattHourRate(dec!(1.00)));
        Ok(())
    }

    #[test]
    fn test_resolve_after_last_entry() -> crate::prelude::Result {
        assert_eq!(schedule().resolve(date(2030, 1, 1))?.0, KilowattHourRate(dec!(0.75)));
        Ok(())
    }

    #[test]
    fn test_resolve_before_first_entry() {
        let error = schedule().resolve(date(2022, 12, 31)).unwrap_err();
        assert_eq!(error.schedule, "fuel adjustment");
        assert_eq!(error.date, date(2022, 12, 31));
    }

    #[test]
    fn test_resolve_empty() {
        assert!(Schedule::<FuelAdjustment>::default().resolve(date(2023, 1, 1)).is_err());
    }
}
