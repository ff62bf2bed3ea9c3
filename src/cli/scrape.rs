use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tokio::time::{MissedTickBehavior, interval};

use crate::{
    cli::{
        config::ConfigArgs,
        db::DbArgs,
        heartbeat::{Beat, HeartbeatArgs},
    },
    db::Db,
    prelude::*,
    scrape::Scraper,
    source::ReadingSource,
};

#[derive(Parser)]
pub struct ScrapeArgs {
    #[clap(flatten)]
    db: DbArgs,

    #[clap(flatten)]
    config: ConfigArgs,

    #[clap(flatten)]
    heartbeat: HeartbeatArgs,

    #[command(subcommand)]
    command: ScrapeCommand,
}

#[derive(Subcommand)]
enum ScrapeCommand {
    #[command(flatten)]
    Once(OnceCommand),

    /// Keep scraping everything for today.
    #[clap(name = "watch")]
    Watch(WatchArgs),
}

/// One-off scrapes.
#[derive(Subcommand)]
enum OnceCommand {
    /// Generation of every generator, storage of every battery, purchases and sales, and the consumption.
    #[clap(name = "everything")]
    Everything(DateArgs),

    /// Quarter-hourly generation of the generator.
    #[clap(name = "generation")]
    Generation {
        /// Registered generator name.
        generator: String,

        #[clap(flatten)]
        date: DateArgs,
    },

    /// Quarter-hourly state of charge of the battery.
    #[clap(name = "storage")]
    Storage {
        /// Registered battery name.
        battery: String,

        #[clap(flatten)]
        date: DateArgs,
    },

    /// Hourly purchases from and sales to the grid.
    #[clap(name = "buysell")]
    BuySell(DateArgs),

    /// Quarter-hourly household consumption.
    #[clap(name = "consumption")]
    Consumption(DateArgs),

    /// Consumption of every day from `start` up to, but not including, `end`.
    #[clap(name = "consumption-range")]
    ConsumptionRange { start: NaiveDate, end: NaiveDate },
}

#[derive(Copy, Clone, Parser)]
struct DateArgs {
    /// Date to scrape, defaults to today.
    date: Option<NaiveDate>,
}

#[derive(Copy, Clone, Parser)]
struct WatchArgs {
    #[clap(long, default_value = "30min", value_parser = humantime::parse_duration, env = "SCRAPE_EVERY")]
    every: Duration,
}

impl ScrapeArgs {
    pub async fn run(self) -> Result {
        let config = self.config.load()?;
        let mut source = config.source()?.build();
        let mut db = self.db.connect()?;

        match self.command {
            ScrapeCommand::Once(command) => {
                let now = Local::now().naive_local();
                let mut scraper = Scraper::builder().db(&mut db).source(source.as_mut()).now(now).build();
                let outcome = command.run(&mut scraper);
                self.heartbeat.send(&Beat::new(now, &outcome)).await;
                let n_readings = outcome?;
                info!(n_readings, "scraped");
                Ok(())
            }
            ScrapeCommand::Watch(args) => {
                watch(&mut db, source.as_mut(), args.every, &self.heartbeat).await
            }
        }
    }
}

impl OnceCommand {
    fn run(self, scraper: &mut Scraper<'_>) -> Result<usize> {
        match self {
            Self::Everything(args) => scraper.everything(args.date),
            Self::Generation { generator, date } => scraper.generation(&generator, date.date),
            Self::Storage { battery, date } => scraper.storage(&battery, date.date),
            Self::BuySell(args) => scraper.buy_sell(args.date),
            Self::Consumption(args) => scraper.consumption(args.date),
            Self::ConsumptionRange { start, end } => scraper.consumption_range(start, end),
        }
    }
}

/// Scrape everything for today on every tick until interrupted.
///
/// A failed round is logged and the loop carries on.
#[instrument(skip_all, fields(every = %humantime::format_duration(every)))]
async fn watch(
    db: &mut Db,
    source: &mut dyn ReadingSource,
    every: Duration,
    heartbeat: &HeartbeatArgs,
) -> Result {
    let mut interval = interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl+C")?;
                info!("interrupted");
                return Ok(());
            }
        }

        let now = Local::now().naive_local();
        let outcome = Scraper::builder().db(&mut *db).source(&mut *source).now(now).build().everything(None);
        match &outcome {
            Ok(n_readings) => info!(n_readings, "scraped"),
            Err(error) => error!("failed to scrape: {error:#}"),
        }
        heartbeat.send(&Beat::new(now, &outcome)).await;
    }
}
