use std::time::Duration;

use chrono::NaiveDateTime;
use clap::Parser;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::prelude::*;

#[derive(Parser)]
pub struct HeartbeatArgs {
    /// Receives a JSON summary of every scrape round, for example, a dead man's switch.
    #[clap(long = "heartbeat-url", env = "HEARTBEAT_URL")]
    url: Option<Url>,
}

/// Outcome of one scrape round as posted to the heartbeat URL.
#[must_use]
#[derive(Debug, Serialize)]
pub struct Beat {
    pub scraped_at: NaiveDateTime,
    pub n_readings: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Beat {
    pub fn new(scraped_at: NaiveDateTime, outcome: &Result<usize>) -> Self {
        match outcome {
            Ok(n_readings) => Self { scraped_at, n_readings: *n_readings, error: None },
            Err(error) => Self { scraped_at, n_readings: 0, error: Some(format!("{error:#}")) },
        }
    }
}

impl HeartbeatArgs {
    /// Post the beat, a failure to deliver it only gets logged.
    pub async fn send(&self, beat: &Beat) {
        let Some(url) = &self.url else {
            return;
        };
        if let Err(error) = Self::post(url.clone(), beat).await {
            warn!("failed to send the heartbeat: {error:#}");
        }
    }

    #[instrument(skip_all, fields(n_readings = beat.n_readings, failed = beat.error.is_some()))]
    async fn post(url: Url, beat: &Beat) -> Result {
        debug!("sending the heartbeat…");
        Client::builder()
            .timeout(Duration::from_secs(3))
            .build()?
            .post(url)
            .json(beat)
            .send()
            .await
            .context("the heartbeat endpoint is unreachable")?
            .error_for_status()?;
        Ok(())
    }
}
