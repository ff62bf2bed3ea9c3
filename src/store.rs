use chrono::NaiveDate;

use crate::{billing::BillingPeriod, prelude::*, quantity::energy::KilowattHours};

/// Kind of metered energy.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Category {
    Generation,
    Consumption,
    Purchase,
    Sale,
}

impl Category {
    pub const ALL: [Self; 4] = [Self::Generation, Self::Consumption, Self::Purchase, Self::Sale];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::Consumption => "consumption",
            Self::Purchase => "purchase",
            Self::Sale => "sale",
        }
    }
}

/// Time-series readings the billing statistics are derived from.
pub trait ReadingStore {
    /// Total energy of the category on the day.
    fn sum_kwh(&self, category: Category, on: NaiveDate) -> Result<KilowattHours>;

    /// Daily totals within the period, ordered by date.
    ///
    /// Days without readings are absent.
    fn series_kwh(
        &self,
        category: Category,
        period: BillingPeriod,
    ) -> Result<Vec<(NaiveDate, KilowattHours)>>;
}
