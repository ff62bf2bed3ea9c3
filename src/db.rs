pub mod hardware;
pub mod readings;

use std::{path::Path, time::Duration};

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, TransactionBehavior};

pub use self::{
    hardware::{Batteries, Battery, Generator, Generators},
    readings::{ChargeReadings, EnergyReadings},
};
use crate::{
    billing::BillingPeriod,
    prelude::*,
    quantity::energy::KilowattHours,
    store::{Category, ReadingStore},
};

// language=sqlite
const SCHEMA: &str = r"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS generators (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS batteries (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        capacity_kwh_millis INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    -- `meter_id` is the generator for generation readings and 0 for everything else.
    CREATE TABLE IF NOT EXISTS energy_readings (
        category TEXT NOT NULL,
        meter_id INTEGER NOT NULL DEFAULT 0,
        occurred_at TEXT NOT NULL,
        kwh_millis INTEGER NOT NULL,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (category, meter_id, occurred_at)
    );

    CREATE INDEX IF NOT EXISTS energy_readings_category_occurred_at
        ON energy_readings (category, occurred_at);

    CREATE TABLE IF NOT EXISTS charge_readings (
        battery_id INTEGER NOT NULL REFERENCES batteries (id) ON DELETE CASCADE,
        occurred_at TEXT NOT NULL,
        charge_millipercent INTEGER NOT NULL,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (battery_id, occurred_at)
    );
";

#[must_use]
pub struct Db(Connection);

impl Db {
    /// Open the database file, creating the schema when needed.
    ///
    /// `:memory:` opens a private in-memory database.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn connect(path: &Path) -> Result<Self> {
        info!("connecting…");
        let connection = Connection::open(path)
            .with_context(|| format!("failed to open `{}`", path.display()))?;
        connection.busy_timeout(Duration::from_secs(30))?;
        connection.execute_batch(SCHEMA).context("failed to initialize the schema")?;
        Ok(Self(connection))
    }

    pub const fn generators(&self) -> Generators<'_> {
        Generators(&self.0)
    }

    pub const fn batteries(&self) -> Batteries<'_> {
        Batteries(&self.0)
    }

    pub const fn energy_readings(&self, category: Category) -> EnergyReadings<'_> {
        EnergyReadings::new(&self.0, category)
    }

    pub const fn charge_readings(&self) -> ChargeReadings<'_> {
        ChargeReadings(&self.0)
    }

    /// Run the writes atomically.
    ///
    /// The write lock is taken upfront, so concurrent writers are serialized
    /// and readers never see a half-recorded batch.
    pub fn transaction<T>(&mut self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let transaction = self.0.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&transaction)?;
        transaction.commit().context("failed to commit the transaction")?;
        Ok(value)
    }
}

impl ReadingStore for Db {
    fn sum_kwh(&self, category: Category, on: NaiveDate) -> Result<KilowattHours> {
        let since = on.and_time(NaiveTime::MIN);
        let until = on.succ_opt().context("date overflow")?.and_time(NaiveTime::MIN);
        self.energy_readings(category).sum_between(since, until)
    }

    fn series_kwh(
        &self,
        category: Category,
        period: BillingPeriod,
    ) -> Result<Vec<(NaiveDate, KilowattHours)>> {
        self.energy_readings(category).daily_sums(period)
    }
}

#[cfg(test)]
pub mod tests {
    use chrono::NaiveDateTime;

    use super::*;

    pub fn in_memory() -> Result<Db> {
        Db::connect(Path::new(":memory:"))
    }

    pub fn timestamp(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_connect_twice_ok() -> Result {
        let file = tempfile::NamedTempFile::new()?;
        Db::connect(file.path())?.generators().add("roof")?;
        assert_eq!(Db::connect(file.path())?.generators().all()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_transaction_rolls_back() -> Result {
        let mut db = in_memory()?;
        let result: Result = db.transaction(|connection| {
            Generators(connection).add("roof")?;
            bail!("boom");
        });
        assert!(result.is_err());
        assert!(db.generators().all()?.is_empty());
        Ok(())
    }
}
