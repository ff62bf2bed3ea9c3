use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    error::InvalidInputError,
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
    rates::schedule::Versioned,
};

/// One price band of a graduated tariff.
#[must_use]
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Tier {
    pub min_kwh: KilowattHours,

    /// `None` means the band is unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_kwh: Option<KilowattHours>,

    pub price: KilowattHourRate,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TariffError {
    #[error("tariff has no tiers")]
    Empty,

    #[error("tier #{0} starts below zero")]
    NegativeMinimum(usize),

    #[error("tier #{0} does not end after it starts")]
    EmptyBand(usize),

    #[error("tier #{0} overlaps the previous one")]
    Overlap(usize),

    #[error("only the last tier may be unbounded, but tier #{0} is")]
    UnboundedNotLast(usize),
}

/// Graduated (progressive) tariff: every band is billed at its own price.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tier>", into = "Vec<Tier>")]
pub struct TariffTable(Vec<Tier>);

impl TryFrom<Vec<Tier>> for TariffTable {
    type Error = TariffError;

    fn try_from(mut tiers: Vec<Tier>) -> Result<Self, Self::Error> {
        if tiers.is_empty() {
            return Err(TariffError::Empty);
        }
        tiers.sort_by_key(|tier| tier.min_kwh);
        let last_index = tiers.len() - 1;
        let mut previous_max = None;
        for (index, tier) in tiers.iter().enumerate() {
            if tier.min_kwh.is_sign_negative() {
                return Err(TariffError::NegativeMinimum(index));
            }
            if let Some(previous_max) = previous_max
                && tier.min_kwh < previous_max
            {
                return Err(TariffError::Overlap(index));
            }
            match tier.max_kwh {
                Some(max_kwh) if max_kwh <= tier.min_kwh => {
                    return Err(TariffError::EmptyBand(index));
                }
                Some(max_kwh) => previous_max = Some(max_kwh),
                None if index != last_index => return Err(TariffError::UnboundedNotLast(index)),
                None => {}
            }
        }
        Ok(Self(tiers))
    }
}

impl From<TariffTable> for Vec<Tier> {
    fn from(table: TariffTable) -> Self {
        table.0
    }
}

impl Versioned for TariffTable {
    const SCHEDULE: &'static str = "tariff";
}

impl TariffTable {
    #[must_use]
    pub fn tiers(&self) -> &[Tier] {
        &self.0
    }

    /// Price the energy against the tiers, highest band first.
    ///
    /// A band is billed only for the part of `total` that falls into it,
    /// and the unbounded band ends at `total` itself.
    pub fn cost(&self, total: KilowattHours) -> Result<Cost, InvalidInputError> {
        if total.is_sign_negative() {
            return Err(InvalidInputError::NegativeEnergy(total));
        }
        Ok(self
            .tiers()
            .iter()
            .rev()
            .filter(|tier| tier.min_kwh <= total)
            .map(|tier| {
                let upper = tier.max_kwh.map_or(total, |max_kwh| max_kwh.min(total));
                (upper - tier.min_kwh) * tier.price
            })
            .sum())
    }
}
