use std::path::PathBuf;

use clap::Parser;

use crate::{config::Config, prelude::*};

#[derive(Parser)]
pub struct ConfigArgs {
    /// Billing, rate schedules, and the reading source.
    #[clap(long = "config", env = "SUNBOTTLE_CONFIG", default_value = "sunbottle.toml")]
    path: PathBuf,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<Config> {
        Config::load(&self.path)
    }
}
