//! Recording the readings retrieved from a [`ReadingSource`].

use bon::Builder;
use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    db::{ChargeReadings, Db, EnergyReadings},
    prelude::*,
    reading::BuySellReading,
    source::{ReadingSource, Request},
    store::Category,
};

/// Non-generation readings are recorded under this meter.
const HOUSEHOLD_METER_ID: i64 = 0;

/// Retrieves the readings from the source and upserts them into the database.
///
/// Every call records its readings in a single transaction,
/// so a failed retrieval leaves nothing behind.
#[derive(Builder)]
pub struct Scraper<'a> {
    db: &'a mut Db,
    source: &'a mut dyn ReadingSource,

    /// Defines "today" and which readings are still in the future.
    now: NaiveDateTime,
}

impl Scraper<'_> {
    #[instrument(skip_all, fields(generator = generator, date = ?date))]
    pub fn generation(&mut self, generator: &str, date: Option<NaiveDate>) -> Result<usize> {
        let generator = self.db.generators().get(generator)?;
        let request = self.request(date);
        let readings = self.source.generation(request)?;
        self.db.transaction(|connection| {
            let generation = EnergyReadings::new(connection, Category::Generation);
            for reading in &readings {
                generation.upsert(generator.id, reading)?;
            }
            Ok(())
        })?;
        info!(n_readings = readings.len(), "recorded");
        Ok(readings.len())
    }

    #[instrument(skip_all, fields(battery = battery, date = ?date))]
    pub fn storage(&mut self, battery: &str, date: Option<NaiveDate>) -> Result<usize> {
        let battery = self.db.batteries().get(battery)?;
        let request = self.request(date);
        let readings = self.source.storage(request)?;
        self.db.transaction(|connection| {
            let charges = ChargeReadings(connection);
            for reading in &readings {
                charges.upsert(battery.id, reading)?;
            }
            Ok(())
        })?;
        info!(n_readings = readings.len(), "recorded");
        Ok(readings.len())
    }

    #[instrument(skip_all, fields(date = ?date))]
    pub fn buy_sell(&mut self, date: Option<NaiveDate>) -> Result<usize> {
        let request = self.request(date);
        let readings = self.source.buy_sell(request)?;
        self.db.transaction(|connection| {
            let purchases = EnergyReadings::new(connection, Category::Purchase);
            let sales = EnergyReadings::new(connection, Category::Sale);
            for reading in &readings {
                match reading {
                    BuySellReading::Buy(reading) => purchases.upsert(HOUSEHOLD_METER_ID, reading)?,
                    BuySellReading::Sell(reading) => sales.upsert(HOUSEHOLD_METER_ID, reading)?,
                }
            }
            Ok(())
        })?;
        info!(n_readings = readings.len(), "recorded");
        Ok(readings.len())
    }

    #[instrument(skip_all, fields(date = ?date))]
    pub fn consumption(&mut self, date: Option<NaiveDate>) -> Result<usize> {
        let request = self.request(date);
        let readings = self.source.consumption(request)?;
        self.db.transaction(|connection| {
            let consumption = EnergyReadings::new(connection, Category::Consumption);
            for reading in &readings {
                consumption.upsert(HOUSEHOLD_METER_ID, reading)?;
            }
            Ok(())
        })?;
        info!(n_readings = readings.len(), "recorded");
        Ok(readings.len())
    }

    /// Consumption for every day in `start..end`.
    #[instrument(skip_all, fields(start = %start, end = %end))]
    pub fn consumption_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<usize> {
        ensure!(start < end, "the range end must be after its start");
        let mut n_readings = 0;
        for date in start.iter_days().take_while(|date| *date < end) {
            n_readings += self.consumption(Some(date))?;
        }
        Ok(n_readings)
    }

    /// Every generator, every battery, purchases and sales, and the consumption.
    ///
    /// The portal does not split the generation by generator,
    /// so every generator gets the same readings.
    #[instrument(skip_all, fields(date = ?date))]
    pub fn everything(&mut self, date: Option<NaiveDate>) -> Result<usize> {
        let mut n_readings = 0;
        for generator in self.db.generators().all()? {
            n_readings += self.generation(&generator.name, date)?;
        }
        for battery in self.db.batteries().all()? {
            n_readings += self.storage(&battery.name, date)?;
        }
        n_readings += self.buy_sell(date)?;
        n_readings += self.consumption(date)?;
        info!(n_readings, "scraped everything");
        Ok(n_readings)
    }

    fn request(&self, date: Option<NaiveDate>) -> Request {
        Request::new(date, self.now)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{
        db::tests::{in_memory, timestamp},
        quantity::{energy::KilowattHours, percent::Percent},
        reading::{ChargeReading, EnergyReading},
    };

    /// One reading at noon of the requested date per category, remembering the requested dates.
    #[derive(Default)]
    struct Noon {
        requested: Vec<NaiveDate>,
        fail_consumption: bool,
    }

    impl Noon {
        fn energy(&mut self, request: Request, kwh: KilowattHours) -> Vec<EnergyReading> {
            self.requested.push(request.date);
            vec![EnergyReading { occurred_at: request.date.and_hms_opt(12, 0, 0).unwrap(), kwh }]
        }
    }

    impl ReadingSource for Noon {
        fn generation(&mut self, request: Request) -> Result<Vec<EnergyReading>> {
            Ok(self.energy(request, KilowattHours(dec!(2.5))))
        }

        fn storage(&mut self, request: Request) -> Result<Vec<ChargeReading>> {
            self.requested.push(request.date);
            Ok(vec![ChargeReading {
                occurred_at: request.date.and_hms_opt(12, 0, 0).unwrap(),
                charge: Percent(dec!(80)),
            }])
        }

        fn buy_sell(&mut self, request: Request) -> Result<Vec<BuySellReading>> {
            let bought = self.energy(request, KilowattHours(dec!(0.5)));
            let sold = self.energy(request, KilowattHours(dec!(1.5)));
            Ok(vec![BuySellReading::Buy(bought[0]), BuySellReading::Sell(sold[0])])
        }

        fn consumption(&mut self, request: Request) -> Result<Vec<EnergyReading>> {
            ensure!(!self.fail_consumption, "the portal is down");
            Ok(self.energy(request, KilowattHours(dec!(3))))
        }
    }

    #[test]
    fn test_everything() -> Result {
        let mut db = in_memory()?;
        db.generators().add("roof")?;
        db.generators().add("shed")?;
        let battery = db.batteries().add("garage", KilowattHours(dec!(6.5)))?;

        let mut source = Noon::default();
        let n_readings = Scraper::builder()
            .db(&mut db)
            .source(&mut source)
            .now(timestamp("2024-05-01 18:00"))
            .build()
            .everything(None)?;
        assert_eq!(n_readings, 6);
        assert!(source.requested.iter().all(|date| date.to_string() == "2024-05-01"));

        assert_eq!(db.energy_readings(Category::Generation).total()?, KilowattHours(dec!(5)));
        assert_eq!(db.energy_readings(Category::Purchase).total()?, KilowattHours(dec!(0.5)));
        assert_eq!(db.energy_readings(Category::Sale).total()?, KilowattHours(dec!(1.5)));
        assert_eq!(db.energy_readings(Category::Consumption).total()?, KilowattHours(dec!(3)));
        assert_eq!(
            db.charge_readings().last_before(battery.id, timestamp("2024-05-01 18:00"))?,
            Some(Percent(dec!(80))),
        );
        Ok(())
    }

    #[test]
    fn test_rescrape_overwrites() -> Result {
        let mut db = in_memory()?;
        let mut source = Noon::default();
        let mut scraper =
            Scraper::builder().db(&mut db).source(&mut source).now(timestamp("2024-05-01 18:00")).build();
        scraper.buy_sell(None)?;
        scraper.buy_sell(None)?;
        assert_eq!(db.energy_readings(Category::Sale).total()?, KilowattHours(dec!(1.5)));
        Ok(())
    }

    #[test]
    fn test_unknown_generator() -> Result {
        let mut db = in_memory()?;
        let mut source = Noon::default();
        let error = Scraper::builder()
            .db(&mut db)
            .source(&mut source)
            .now(timestamp("2024-05-01 18:00"))
            .build()
            .generation("roof", None)
            .unwrap_err();
        assert_eq!(error.to_string(), "generator `roof` does not exist");
        assert!(source.requested.is_empty());
        Ok(())
    }

    #[test]
    fn test_consumption_range_excludes_end() -> Result {
        let mut db = in_memory()?;
        let mut source = Noon::default();
        let n_readings = Scraper::builder()
            .db(&mut db)
            .source(&mut source)
            .now(timestamp("2024-05-10 18:00"))
            .build()
            .consumption_range(
                NaiveDate::from_ymd_opt(2024, 4, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            )?;
        assert_eq!(n_readings, 3);
        assert_eq!(
            source.requested.iter().map(ToString::to_string).collect::<Vec<_>>(),
            ["2024-04-29", "2024-04-30", "2024-05-01"],
        );
        assert_eq!(db.energy_readings(Category::Consumption).total()?, KilowattHours(dec!(9)));
        Ok(())
    }

    #[test]
    fn test_empty_range() -> Result {
        let mut db = in_memory()?;
        let mut source = Noon::default();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let result = Scraper::builder()
            .db(&mut db)
            .source(&mut source)
            .now(timestamp("2024-05-10 18:00"))
            .build()
            .consumption_range(date, date);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_failed_source_records_nothing() -> Result {
        let mut db = in_memory()?;
        let mut source = Noon { fail_consumption: true, ..Noon::default() };
        let result = Scraper::builder()
            .db(&mut db)
            .source(&mut source)
            .now(timestamp("2024-05-01 18:00"))
            .build()
            .everything(None);
        assert!(result.is_err());
        assert_eq!(db.energy_readings(Category::Purchase).total()?, KilowattHours(dec!(0.5)));
        assert_eq!(db.energy_readings(Category::Consumption).total()?, KilowattHours::ZERO);
        Ok(())
    }
}
