#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod billing;
mod cli;
mod config;
mod dashboard;
mod db;
mod error;
mod prelude;
mod quantity;
mod rates;
mod reading;
mod scrape;
mod source;
mod store;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Scrape(args) => args.run().await?,
        Command::Report(args) => args.run()?,
        Command::Hardware(args) => args.run()?,
    }

    info!("done!");
    Ok(())
}
