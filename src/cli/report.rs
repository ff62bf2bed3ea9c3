use chrono::Local;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::{
    billing::BillingCalculator,
    cli::{config::ConfigArgs, db::DbArgs},
    dashboard::{Dashboard, GenerationChart},
    prelude::*,
    tables::{build_daily_table, build_dashboard_table, build_report_table},
};

#[derive(Parser)]
pub struct ReportArgs {
    #[clap(flatten)]
    db: DbArgs,

    #[clap(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: ReportCommand,
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Costs and savings of every billing period.
    #[clap(name = "savings")]
    Savings(SavingsArgs),

    /// Today's summary.
    #[clap(name = "dashboard")]
    Dashboard(OutputArgs),

    /// Quarter-hourly generation of yesterday, today, and the same day a year ago, as JSON.
    #[clap(name = "chart")]
    Chart,
}

#[derive(Copy, Clone, Parser)]
struct OutputArgs {
    /// Print JSON instead of a table.
    #[clap(long)]
    json: bool,
}

#[derive(Copy, Clone, Parser)]
struct SavingsArgs {
    #[clap(flatten)]
    output: OutputArgs,

    /// Also report the billing period that is still in progress.
    #[clap(long)]
    include_current: bool,

    /// Also print the daily breakdown of every period.
    #[clap(long, conflicts_with = "json")]
    daily: bool,
}

impl ReportArgs {
    pub fn run(self) -> Result {
        let config = self.config.load()?;
        let db = self.db.connect()?;
        let now = Local::now().naive_local();

        match self.command {
            ReportCommand::Savings(args) => {
                let report = BillingCalculator::builder()
                    .store(&db)
                    .rates(&config.rates)
                    .first_period_start(config.billing.first_period_start)
                    .today(now.date())
                    .include_current(args.include_current)
                    .currency_decimals(config.billing.currency_decimals)
                    .build()
                    .report()?;
                if args.output.json {
                    print_json(&report)?;
                } else {
                    println!("{}", build_report_table(&report));
                    if args.daily {
                        for stats in &report.periods {
                            println!("{:?}", stats.period);
                            println!("{}", build_daily_table(stats));
                        }
                    }
                }
            }
            ReportCommand::Dashboard(args) => {
                let dashboard = Dashboard::query(&db, &config.rates, now)?;
                if args.json {
                    print_json(&dashboard)?;
                } else {
                    println!("{}", build_dashboard_table(&dashboard));
                }
            }
            ReportCommand::Chart => {
                print_json(&GenerationChart::query(&db, now)?)?;
            }
        }

        Ok(())
    }
}

fn print_json(value: &impl Serialize) -> Result {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
