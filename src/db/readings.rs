use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension};

use crate::{
    billing::BillingPeriod,
    prelude::*,
    quantity::{energy::KilowattHours, percent::Percent},
    reading::{ChargeReading, EnergyReading},
    store::Category,
};

/// Readings of one energy category.
#[must_use]
pub struct EnergyReadings<'c> {
    connection: &'c Connection,
    category: Category,
}

impl<'c> EnergyReadings<'c> {
    pub const fn new(connection: &'c Connection, category: Category) -> Self {
        Self { connection, category }
    }

    /// Insert the reading or overwrite the value recorded for the same meter and timestamp.
    ///
    /// `meter_id` is the generator ID for generation readings and `0` otherwise.
    pub fn upsert(&self, meter_id: i64, reading: &EnergyReading) -> Result {
        // language=sqlite
        const SQL: &str = r"
            INSERT INTO energy_readings (category, meter_id, occurred_at, kwh_millis)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (category, meter_id, occurred_at) DO UPDATE SET
                kwh_millis = excluded.kwh_millis,
                updated_at = CURRENT_TIMESTAMP
        ";
        self.connection.prepare_cached(SQL)?.execute((
            self.category.as_str(),
            meter_id,
            reading.occurred_at,
            reading.kwh.to_millis()?,
        ))?;
        Ok(())
    }

    /// Sum of the readings in `since..until`.
    pub fn sum_between(&self, since: NaiveDateTime, until: NaiveDateTime) -> Result<KilowattHours> {
        // language=sqlite
        const SQL: &str = r"
            SELECT COALESCE(SUM(kwh_millis), 0) FROM energy_readings
            WHERE category = ?1 AND occurred_at >= ?2 AND occurred_at < ?3
        ";
        let millis = self
            .connection
            .prepare_cached(SQL)?
            .query_row((self.category.as_str(), since, until), |row| row.get(0))?;
        Ok(KilowattHours::from_millis(millis))
    }

    /// Sum of all the readings ever recorded.
    pub fn total(&self) -> Result<KilowattHours> {
        // language=sqlite
        const SQL: &str =
            "SELECT COALESCE(SUM(kwh_millis), 0) FROM energy_readings WHERE category = ?1";
        let millis =
            self.connection.prepare_cached(SQL)?.query_row((self.category.as_str(),), |row| row.get(0))?;
        Ok(KilowattHours::from_millis(millis))
    }

    /// Daily totals within the period, only for the days that have readings.
    pub fn daily_sums(&self, period: BillingPeriod) -> Result<Vec<(NaiveDate, KilowattHours)>> {
        // language=sqlite
        const SQL: &str = r"
            SELECT date(occurred_at) AS day, SUM(kwh_millis) FROM energy_readings
            WHERE category = ?1 AND occurred_at >= ?2 AND occurred_at <= ?3
            GROUP BY day
            ORDER BY day
        ";
        let mut statement = self.connection.prepare_cached(SQL)?;
        let sums = statement
            .query_map((self.category.as_str(), period.start_at(), period.end_at()), |row| {
                Ok((row.get(0)?, KilowattHours::from_millis(row.get(1)?)))
            })?
            .collect::<Result<_, _>>()?;
        Ok(sums)
    }

    /// Per-timestamp totals across all meters in `since..until`, ordered by time.
    pub fn series_between(
        &self,
        since: NaiveDateTime,
        until: NaiveDateTime,
    ) -> Result<Vec<EnergyReading>> {
        // language=sqlite
        const SQL: &str = r"
            SELECT occurred_at, SUM(kwh_millis) FROM energy_readings
            WHERE category = ?1 AND occurred_at >= ?2 AND occurred_at < ?3
            GROUP BY occurred_at
            ORDER BY occurred_at
        ";
        let mut statement = self.connection.prepare_cached(SQL)?;
        let readings = statement
            .query_map((self.category.as_str(), since, until), |row| {
                Ok(EnergyReading {
                    occurred_at: row.get(0)?,
                    kwh: KilowattHours::from_millis(row.get(1)?),
                })
            })?
            .collect::<Result<_, _>>()?;
        Ok(readings)
    }
}

#[must_use]
pub struct ChargeReadings<'c>(pub &'c Connection);

impl ChargeReadings<'_> {
    pub fn upsert(&self, battery_id: i64, reading: &ChargeReading) -> Result {
        // language=sqlite
        const SQL: &str = r"
            INSERT INTO charge_readings (battery_id, occurred_at, charge_millipercent)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (battery_id, occurred_at) DO UPDATE SET
                charge_millipercent = excluded.charge_millipercent,
                updated_at = CURRENT_TIMESTAMP
        ";
        self.0.prepare_cached(SQL)?.execute((
            battery_id,
            reading.occurred_at,
            reading.charge.to_millis()?,
        ))?;
        Ok(())
    }

    /// The latest charge recorded at or before the timestamp.
    pub fn last_before(&self, battery_id: i64, timestamp: NaiveDateTime) -> Result<Option<Percent>> {
        // language=sqlite
        const SQL: &str = r"
            SELECT charge_millipercent FROM charge_readings
            WHERE battery_id = ?1 AND occurred_at <= ?2
            ORDER BY occurred_at DESC
            LIMIT 1
        ";
        let millipercent: Option<i64> = self
            .0
            .prepare_cached(SQL)?
            .query_row((battery_id, timestamp), |row| row.get(0))
            .optional()?;
        Ok(millipercent.map(Percent::from_millis))
    }
}
