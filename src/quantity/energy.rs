use std::ops::Mul;

use rust_decimal::Decimal;

use crate::quantity::{cost::Cost, rate::KilowattHourRate};

quantity!(KilowattHours, "kWh");

impl KilowattHours {
    #[must_use]
    pub fn to_watt_hours(self) -> Decimal {
        self.0 * Decimal::ONE_THOUSAND
    }
}

impl Mul<KilowattHourRate> for KilowattHours {
    type Output = Cost;

    fn mul(self, rhs: KilowattHourRate) -> Self::Output {
        Cost(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_millis_ok() -> crate::prelude::Result {
        assert_eq!(KilowattHours::from_millis(1_234), KilowattHours(dec!(1.234)));
        assert_eq!(KilowattHours::from_millis(-5), KilowattHours(dec!(-0.005)));
        assert_eq!(KilowattHours(dec!(0.0125)).to_millis()?, 12);
        assert_eq!(KilowattHours(dec!(0.0135)).to_millis()?, 14);
        assert_eq!(KilowattHours(dec!(2)).to_millis()?, 2_000);
        Ok(())
    }

    #[test]
    fn test_display() {
        assert_eq!(KilowattHours(dec!(1.500)).to_string(), "1.5 kWh");
    }
}
