use std::{fs, path::Path};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, de};

use crate::{prelude::*, quantity::cost::Cost, rates::Rates, source::SourceConfig};

/// Contents of the TOML configuration file.
#[must_use]
#[derive(Debug, Deserialize)]
pub struct Config {
    pub billing: BillingConfig,

    #[serde(flatten)]
    pub rates: Rates,

    /// Where the readings are scraped from, not needed for the reports.
    pub source: Option<SourceConfig>,
}

#[must_use]
#[derive(Copy, Clone, Debug, Deserialize)]
pub struct BillingConfig {
    /// Start of the very first billing period, all the following ones are aligned to it.
    pub first_period_start: NaiveDate,

    /// Decimal places of the smallest currency subunit.
    #[serde(
        default = "BillingConfig::default_currency_decimals",
        deserialize_with = "BillingConfig::deserialize_currency_decimals"
    )]
    pub currency_decimals: u32,
}

impl BillingConfig {
    const fn default_currency_decimals() -> u32 {
        2
    }

    fn deserialize_currency_decimals<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let decimals = u32::deserialize(deserializer)?;
        if decimals > Cost::MAX_MINOR_UNIT_DECIMALS {
            return Err(de::Error::custom(format!(
                "`currency_decimals` must not exceed {}, got {decimals}",
                Cost::MAX_MINOR_UNIT_DECIMALS,
            )));
        }
        Ok(decimals)
    }
}

impl Config {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        info!("loading the configuration…");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        info!(
            n_tariffs = config.rates.tariff.len(),
            n_fuel_adjustments = config.rates.fuel_adjustment.len(),
            n_renewable_charges = config.rates.renewable_charge.len(),
            n_feed_in_tariffs = config.rates.feed_in_tariff.len(),
            "loaded",
        );
        for (schedule, is_empty) in [
            ("fuel_adjustment", config.rates.fuel_adjustment.is_empty()),
            ("renewable_charge", config.rates.renewable_charge.is_empty()),
            ("feed_in_tariff", config.rates.feed_in_tariff.is_empty()),
        ] {
            if is_empty {
                warn!(schedule, "the schedule is empty, periods with readings will fail to price");
            }
        }
        Ok(config)
    }

    /// The reading source, or an error pointing at the missing `[source]` table.
    pub fn source(&self) -> Result<&SourceConfig> {
        self.source.as_ref().context("the configuration has no `[source]` table")
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::quantity::{energy::KilowattHours, rate::KilowattHourRate};

    const EXAMPLE: &str = include_str!("../sunbottle.example.toml");

    #[test]
    fn test_example_ok() -> Result {
        let config: Config = toml::from_str(EXAMPLE)?;
        assert_eq!(config.billing.first_period_start, NaiveDate::from_ymd_opt(2023, 6, 15).unwrap());
        assert_eq!(config.billing.currency_decimals, 2);
        assert!(matches!(config.source, Some(SourceConfig::Sharp { .. })));

        let rates = config.rates.on(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())?;
        assert_eq!(rates.tariff.tiers().len(), 3);
        assert_eq!(rates.tariff.tiers()[2].max_kwh, None);
        assert_eq!(rates.fuel_adjustment, KilowattHourRate(dec!(0.95)));
        assert_eq!(rates.renewable_charge, KilowattHourRate(dec!(1.40)));
        assert_eq!(rates.feed_in_tariff, KilowattHourRate(dec!(2.20)));
        assert_eq!(rates.tariff.cost(KilowattHours(dec!(150)))?.0, dec!(505.00));
        Ok(())
    }

    #[test]
    fn test_older_schedule_ok() -> Result {
        let config: Config = toml::from_str(EXAMPLE)?;
        let rates = config.rates.on(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())?;
        assert_eq!(rates.fuel_adjustment, KilowattHourRate(dec!(0.90)));
        assert_eq!(rates.tariff.tiers()[0].price, KilowattHourRate(dec!(3.00)));
        Ok(())
    }

    #[test]
    fn test_minimal_ok() -> Result {
        let config: Config = toml::from_str(
            r#"
                [billing]
                first_period_start = "2024-01-01"
                currency_decimals = 0

                [[tariff."2024-01-01"]]
                min_kwh = 0
                price = 0.25
            "#,
        )?;
        assert_eq!(config.billing.currency_decimals, 0);
        assert!(config.source.is_none());
        assert!(config.source().is_err());
        assert!(config.rates.fuel_adjustment.is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_tariff() {
        let result = toml::from_str::<Config>(
            r#"
                [billing]
                first_period_start = "2024-01-01"

                [[tariff."2024-01-01"]]
                min_kwh = 0
                price = 0.25

                [[tariff."2024-01-01"]]
                min_kwh = 100
                price = 0.30
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_vendor() {
        let result = toml::from_str::<Config>(
            r#"
                [billing]
                first_period_start = "2024-01-01"

                [[tariff."2024-01-01"]]
                min_kwh = 0
                price = 0.25

                [source]
                vendor = "acme"
            "#,
        );
        let error = result.unwrap_err().to_string();
        assert!(error.contains("acme"), "{error}");
    }

    #[test]
    fn test_currency_decimals_limit() -> Result {
        const TEMPLATE: &str = r#"
            [[tariff."2024-01-01"]]
            min_kwh = 0
            price = 0.25

            [billing]
            first_period_start = "2024-01-01"
        "#;

        let config: Config = toml::from_str(&format!("{TEMPLATE}currency_decimals = 28"))?;
        assert_eq!(config.billing.currency_decimals, 28);

        let error = toml::from_str::<Config>(&format!("{TEMPLATE}currency_decimals = 29")).unwrap_err();
        assert!(error.to_string().contains("must not exceed 28"), "{error}");
        Ok(())
    }

    #[test]
    fn test_load_rejects_currency_decimals() -> Result {
        let mut file = tempfile::NamedTempFile::new()?;
        std::io::Write::write_all(
            &mut file,
            br#"
                [billing]
                first_period_start = "2024-01-01"
                currency_decimals = 100

                [[tariff."2024-01-01"]]
                min_kwh = 0
                price = 0.25
            "#,
        )?;
        let error = Config::load(file.path()).unwrap_err();
        assert!(format!("{error:#}").contains("currency_decimals"), "{error:#}");
        Ok(())
    }
}
