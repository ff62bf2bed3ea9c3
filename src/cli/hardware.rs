use clap::{Parser, Subcommand};

use crate::{
    cli::db::DbArgs,
    prelude::*,
    quantity::energy::KilowattHours,
    tables::build_hardware_table,
};

#[derive(Parser)]
pub struct HardwareArgs {
    #[clap(flatten)]
    db: DbArgs,

    #[command(subcommand)]
    command: HardwareCommand,
}

#[derive(Subcommand)]
enum HardwareCommand {
    /// Register a generator, for example, the solar panels on the roof.
    #[clap(name = "add-generator")]
    AddGenerator {
        /// Unique name.
        name: String,
    },

    /// Register a battery.
    #[clap(name = "add-battery")]
    AddBattery {
        /// Unique name.
        name: String,

        /// Usable capacity in kilowatt-hours.
        #[clap(long)]
        capacity: KilowattHours,
    },

    /// List the registered generators and batteries.
    #[clap(name = "list")]
    List,
}

impl HardwareArgs {
    pub fn run(self) -> Result {
        let db = self.db.connect()?;
        match self.command {
            HardwareCommand::AddGenerator { name } => {
                let generator = db.generators().add(&name)?;
                info!(id = generator.id, name = %generator.name, "added");
            }
            HardwareCommand::AddBattery { name, capacity } => {
                let battery = db.batteries().add(&name, capacity)?;
                info!(id = battery.id, name = %battery.name, capacity = %battery.capacity, "added");
            }
            HardwareCommand::List => {
                let generators = db.generators().all()?;
                let batteries = db.batteries().all()?;
                println!("{}", build_hardware_table(&generators, &batteries));
            }
        }
        Ok(())
    }
}
