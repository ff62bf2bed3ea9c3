mod config;
mod db;
mod hardware;
mod heartbeat;
mod report;
mod scrape;

use clap::{Parser, Subcommand};

use crate::cli::{hardware::HardwareArgs, report::ReportArgs, scrape::ScrapeArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Retrieve the readings from the portal and record them.
    #[clap(name = "scrape")]
    Scrape(Box<ScrapeArgs>),

    /// Savings, today's summary, and the generation chart.
    #[clap(name = "report")]
    Report(Box<ReportArgs>),

    /// Manage the registered generators and batteries.
    #[clap(name = "hardware")]
    Hardware(Box<HardwareArgs>),
}
