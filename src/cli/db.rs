use std::path::PathBuf;

use clap::Parser;

use crate::{db::Db, prelude::*};

#[derive(Parser)]
pub struct DbArgs {
    /// SQLite database file, created when missing.
    #[clap(long = "db", env = "SUNBOTTLE_DB", default_value = "sunbottle.sqlite3")]
    path: PathBuf,
}

impl DbArgs {
    pub fn connect(&self) -> Result<Db> {
        Db::connect(&self.path)
    }
}
