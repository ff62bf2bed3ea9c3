use std::fmt::{Debug, Display, Formatter};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::prelude::*;

quantity!(Cost);

impl Cost {
    /// Greatest number of decimal places a `Decimal` can carry.
    pub const MAX_MINOR_UNIT_DECIMALS: u32 = 28;

    /// Round to the nearest multiple of five minor currency units, half away from zero.
    ///
    /// `minor_unit_decimals` is the number of decimal places of the smallest subunit,
    /// so `2` rounds to the nearest `0.05`.
    pub fn round_to_nearest_five(self, minor_unit_decimals: u32) -> Result<Self> {
        ensure!(
            minor_unit_decimals <= Self::MAX_MINOR_UNIT_DECIMALS,
            "{minor_unit_decimals} currency decimals exceed the maximum of {}",
            Self::MAX_MINOR_UNIT_DECIMALS,
        );
        let increment = Decimal::new(5, minor_unit_decimals);
        let mut rounded = self
            .0
            .checked_div(increment)
            .and_then(|steps| {
                steps.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero).checked_mul(increment)
            })
            .with_context(|| format!("`{}` cannot be rounded to {minor_unit_decimals} decimals", self.0))?;
        rounded.rescale(minor_unit_decimals);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        Ok(Self(rounded))
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "¤{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_round_to_nearest_five() -> Result {
        assert_eq!(Cost(dec!(39.50)).round_to_nearest_five(2)?, Cost(dec!(39.50)));
        assert_eq!(Cost(dec!(39.52)).round_to_nearest_five(2)?, Cost(dec!(39.50)));
        assert_eq!(Cost(dec!(39.53)).round_to_nearest_five(2)?, Cost(dec!(39.55)));
        assert_eq!(Cost(dec!(0.025)).round_to_nearest_five(2)?, Cost(dec!(0.05)));
        assert_eq!(Cost(dec!(-0.025)).round_to_nearest_five(2)?, Cost(dec!(-0.05)));
        assert_eq!(Cost(dec!(-0.024)).round_to_nearest_five(2)?, Cost(dec!(0.00)));
        Ok(())
    }

    #[test]
    fn test_round_to_nearest_five_whole_units() -> Result {
        assert_eq!(Cost(dec!(1232.5)).round_to_nearest_five(0)?, Cost(dec!(1235)));
        assert_eq!(Cost(dec!(1232.4)).round_to_nearest_five(0)?, Cost(dec!(1230)));
        Ok(())
    }

    #[test]
    fn test_rounded_scale() -> Result {
        assert_eq!(Cost(dec!(39.5)).round_to_nearest_five(2)?.to_string(), "39.50");
        Ok(())
    }

    #[test]
    fn test_too_many_decimals() -> Result {
        assert_eq!(Cost(dec!(1.23)).round_to_nearest_five(28)?.to_string(), "1.2300000000000000000000000000");
        assert!(Cost(dec!(1.23)).round_to_nearest_five(29).is_err());
        assert!(Cost(dec!(1000)).round_to_nearest_five(28).is_err());
        Ok(())
    }
}
