use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::{prelude::*, quantity::energy::KilowattHours};

/// Electricity generator, for example solar panels.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Generator {
    pub id: i64,
    pub name: String,
}

impl Generator {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self { id: row.get(0)?, name: row.get(1)? })
    }
}

#[must_use]
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Battery {
    pub id: i64,
    pub name: String,
    pub capacity: KilowattHours,
}

impl Battery {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self { id: row.get(0)?, name: row.get(1)?, capacity: KilowattHours::from_millis(row.get(2)?) })
    }
}

#[must_use]
pub struct Generators<'c>(pub &'c Connection);

impl Generators<'_> {
    #[instrument(skip_all, fields(name = name))]
    pub fn add(&self, name: &str) -> Result<Generator> {
        // language=sqlite
        const SQL: &str = "INSERT INTO generators (name) VALUES (?1) RETURNING id, name";

        info!("adding the generator…");
        self.0
            .prepare_cached(SQL)?
            .query_row((name,), Generator::from_row)
            .with_context(|| format!("failed to add generator `{name}`"))
    }

    pub fn find(&self, name: &str) -> Result<Option<Generator>> {
        // language=sqlite
        const SQL: &str = "SELECT id, name FROM generators WHERE name = ?1";
        Ok(self.0.prepare_cached(SQL)?.query_row((name,), Generator::from_row).optional()?)
    }

    pub fn get(&self, name: &str) -> Result<Generator> {
        self.find(name)?.with_context(|| format!("generator `{name}` does not exist"))
    }

    pub fn all(&self) -> Result<Vec<Generator>> {
        // language=sqlite
        const SQL: &str = "SELECT id, name FROM generators ORDER BY id";
        let mut statement = self.0.prepare_cached(SQL)?;
        let generators = statement.query_map((), Generator::from_row)?.collect::<Result<_, _>>()?;
        Ok(generators)
    }
}

#[must_use]
pub struct Batteries<'c>(pub &'c Connection);

impl Batteries<'_> {
    #[instrument(skip_all, fields(name = name, capacity = %capacity))]
    pub fn add(&self, name: &str, capacity: KilowattHours) -> Result<Battery> {
        // language=sqlite
        const SQL: &str = r"
            INSERT INTO batteries (name, capacity_kwh_millis) VALUES (?1, ?2)
            RETURNING id, name, capacity_kwh_millis
        ";

        info!("adding the battery…");
        ensure!(!capacity.is_sign_negative(), "battery capacity must not be negative");
        self.0
            .prepare_cached(SQL)?
            .query_row((name, capacity.to_millis()?), Battery::from_row)
            .with_context(|| format!("failed to add battery `{name}`"))
    }

    pub fn find(&self, name: &str) -> Result<Option<Battery>> {
        // language=sqlite
        const SQL: &str = "SELECT id, name, capacity_kwh_millis FROM batteries WHERE name = ?1";
        Ok(self.0.prepare_cached(SQL)?.query_row((name,), Battery::from_row).optional()?)
    }

    pub fn get(&self, name: &str) -> Result<Battery> {
        self.find(name)?.with_context(|| format!("battery `{name}` does not exist"))
    }

    pub fn all(&self) -> Result<Vec<Battery>> {
        // language=sqlite
        const SQL: &str = "SELECT id, name, capacity_kwh_millis FROM batteries ORDER BY id";
        let mut statement = self.0.prepare_cached(SQL)?;
        let batteries = statement.query_map((), Battery::from_row)?.collect::<Result<_, _>>()?;
        Ok(batteries)
    }
}
