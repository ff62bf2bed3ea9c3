use chrono::NaiveDateTime;
use serde::Serialize;

use crate::quantity::{energy::KilowattHours, percent::Percent};

/// Energy measured over the interval starting at `occurred_at`.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EnergyReading {
    pub occurred_at: NaiveDateTime,
    pub kwh: KilowattHours,
}

/// Battery state of charge at `occurred_at`.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ChargeReading {
    pub occurred_at: NaiveDateTime,
    pub charge: Percent,
}

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum BuySellReading {
    /// Energy bought from the grid.
    Buy(EnergyReading),

    /// Energy sold to the grid.
    Sell(EnergyReading),
}
