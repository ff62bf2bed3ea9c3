use std::{
    fmt::{Debug, Formatter},
    iter::FusedIterator,
};

use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::InvalidInputError;

/// Closed interval of one billing month: from midnight of the first day to 23:59:59 of the last.
#[must_use]
#[derive(Copy, Clone, Eq, PartialEq, Serialize)]
pub struct BillingPeriod {
    start_at: NaiveDateTime,
    end_at: NaiveDateTime,
}

impl Debug for BillingPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start_at, self.end_at)
    }
}

impl BillingPeriod {
    pub fn new(start_at: NaiveDateTime, end_at: NaiveDateTime) -> Result<Self, InvalidInputError> {
        if end_at <= start_at {
            return Err(InvalidInputError::InvertedPeriod { start: start_at, end: end_at });
        }
        Ok(Self { start_at, end_at })
    }

    /// Period covering whole days from `first_day` through `last_day`.
    pub fn from_dates(first_day: NaiveDate, last_day: NaiveDate) -> Result<Self, InvalidInputError> {
        Self::new(first_day.and_time(NaiveTime::MIN), end_of_day(last_day))
    }

    #[must_use]
    pub const fn start_at(self) -> NaiveDateTime {
        self.start_at
    }

    #[must_use]
    pub const fn end_at(self) -> NaiveDateTime {
        self.end_at
    }

    #[must_use]
    pub const fn start_date(self) -> NaiveDate {
        self.start_at.date()
    }

    #[must_use]
    pub const fn end_date(self) -> NaiveDate {
        self.end_at.date()
    }

    /// Every calendar day of the period, in order.
    pub fn dates(self) -> impl Iterator<Item = NaiveDate> {
        self.start_date().iter_days().take_while(move |date| *date <= self.end_date())
    }

    /// Whether the period was over before `today` started.
    #[must_use]
    pub fn is_complete(self, today: NaiveDate) -> bool {
        self.end_date() < today
    }
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

/// Lazy sequence of the monthly billing periods that were over before `today`.
///
/// The period still running on `today` is left out unless [`BillingPeriods::including_current`]
/// asks for it. Period starts are computed from the anchor date rather than from the previous
/// period, so a start on the 31st lands on the last day of shorter months and
/// returns to the 31st afterwards.
#[must_use]
#[derive(Clone, Debug)]
pub struct BillingPeriods {
    first_start: NaiveDate,
    today: NaiveDate,
    include_current: bool,
    index: u32,
}

impl BillingPeriods {
    pub const fn new(first_start: NaiveDate, today: NaiveDate) -> Self {
        Self { first_start, today, include_current: false, index: 0 }
    }

    /// Also emit the period that has started but is not over yet.
    pub const fn including_current(mut self, include_current: bool) -> Self {
        self.include_current = include_current;
        self
    }

    fn start_of(&self, index: u32) -> Option<NaiveDate> {
        self.first_start.checked_add_months(Months::new(index))
    }
}

impl Iterator for BillingPeriods {
    type Item = BillingPeriod;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.start_of(self.index)?;
        if start >= self.today {
            return None;
        }
        let last_day = self.start_of(self.index + 1)?.pred_opt()?;
        if last_day >= self.today && !self.include_current {
            return None;
        }
        self.index += 1;
        BillingPeriod::from_dates(start, last_day).ok()
    }
}

impl FusedIterator for BillingPeriods {}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_periods_mid_month() {
        let periods = BillingPeriods::new(date(2024, 1, 15), date(2024, 4, 1)).collect_vec();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].start_at(), date(2024, 1, 15).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(periods[0].end_at(), date(2024, 2, 14).and_hms_opt(23, 59, 59).unwrap());
        assert_eq!(periods[1].start_date(), date(2024, 2, 15));
        assert_eq!(periods[1].end_date(), date(2024, 3, 14));
    }

    #[test]
    fn test_periods_end_of_month_anchor() {
        let periods = BillingPeriods::new(date(2024, 1, 31), date(2024, 6, 1)).collect_vec();
        let starts = periods.iter().map(|period| period.start_date()).collect_vec();
        assert_eq!(
            starts,
            [date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)],
        );
        assert_eq!(periods[0].end_date(), date(2024, 2, 28));
        assert_eq!(periods[1].end_date(), date(2024, 3, 30));
        assert_eq!(periods[3].end_date(), date(2024, 5, 30));
    }

    #[test]
    fn test_periods_are_contiguous_and_ordered() {
        let periods = BillingPeriods::new(date(2022, 8, 30), date(2025, 1, 1)).collect_vec();
        assert!(!periods.is_empty());
        for (previous, next) in periods.iter().tuple_windows() {
            assert!(previous.end_at() < next.start_at());
            assert_eq!(previous.end_date().succ_opt(), Some(next.start_date()));
        }
        assert!(periods.iter().all(|period| period.is_complete(date(2025, 1, 1))));
    }

    #[test]
    fn test_period_ending_yesterday_is_included() {
        let periods = BillingPeriods::new(date(2024, 1, 10), date(2024, 3, 10)).collect_vec();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[1].start_date(), date(2024, 2, 10));
        assert_eq!(periods[1].end_date(), date(2024, 3, 9));
    }

    #[test]
    fn test_in_progress_period_is_excluded() {
        assert_eq!(BillingPeriods::new(date(2024, 1, 10), date(2024, 1, 11)).count(), 0);
        assert_eq!(BillingPeriods::new(date(2024, 1, 10), date(2024, 2, 9)).count(), 0);

        let periods = BillingPeriods::new(date(2024, 1, 1), date(2024, 2, 5)).collect_vec();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].end_date(), date(2024, 1, 31));
    }

    #[test]
    fn test_including_current() {
        let periods = BillingPeriods::new(date(2024, 1, 10), date(2024, 1, 11))
            .including_current(true)
            .collect_vec();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].end_date(), date(2024, 2, 9));
        assert!(!periods[0].is_complete(date(2024, 1, 11)));
        assert!(!periods[0].is_complete(date(2024, 2, 9)));
        assert!(periods[0].is_complete(date(2024, 2, 10)));

        // A period starting today has not started yet:
        let periods = BillingPeriods::new(date(2024, 1, 10), date(2024, 3, 10))
            .including_current(true)
            .collect_vec();
        assert_eq!(periods.len(), 2);
    }

    #[test]
    fn test_empty_when_not_started() {
        assert_eq!(BillingPeriods::new(date(2024, 1, 10), date(2024, 1, 10)).count(), 0);
        assert_eq!(BillingPeriods::new(date(2024, 1, 10), date(2023, 1, 10)).count(), 0);
    }

    #[test]
    fn test_restartable() {
        let periods = BillingPeriods::new(date(2024, 1, 1), date(2024, 6, 1));
        assert_eq!(periods.clone().collect_vec(), periods.collect_vec());
    }

    #[test]
    fn test_dates() -> crate::prelude::Result {
        let period = BillingPeriod::from_dates(date(2024, 2, 27), date(2024, 3, 2))?;
        assert_eq!(
            period.dates().collect_vec(),
            [date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1), date(2024, 3, 2)],
        );
        Ok(())
    }

    #[test]
    fn test_inverted_period() {
        let start = date(2024, 2, 1).and_hms_opt(0, 0, 0).unwrap();
        assert!(matches!(
            BillingPeriod::new(start, start),
            Err(InvalidInputError::InvertedPeriod { .. })
        ));
        assert!(BillingPeriod::from_dates(date(2024, 2, 2), date(2024, 2, 1)).is_err());
    }
}
