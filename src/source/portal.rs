use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde_json::Value;

use crate::prelude::*;

/// Dashboard page of the vendor portal.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Page {
    Generation,
    Storage,
    BuySell,
    Consumption,
}

impl Page {
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::Storage => "storage",
            Self::BuySell => "buysell",
            Self::Consumption => "consumption",
        }
    }
}

/// Access to the data a portal page renders its charts from.
pub trait Portal {
    /// Chart payload of the page for the date.
    fn render_result(&mut self, page: Page, date: NaiveDate) -> Result<Value>;
}

/// Payloads captured by a browser harness, laid out as `<root>/<page>/<YYYY-MM-DD>.json`.
#[must_use]
pub struct DumpDirectory {
    root: PathBuf,
}

impl DumpDirectory {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    #[must_use]
    pub fn path_of(&self, page: Page, date: NaiveDate) -> PathBuf {
        self.root.join(page.slug()).join(format!("{date}.json"))
    }
}

impl Portal for DumpDirectory {
    #[instrument(skip_all, fields(page = page.slug(), date = %date))]
    fn render_result(&mut self, page: Page, date: NaiveDate) -> Result<Value> {
        let path = self.path_of(page, date);
        debug!(path = %path.display(), "reading the payload…");
        let payload = fs::read_to_string(&path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        serde_json::from_str(&payload)
            .with_context(|| format!("`{}` is not a valid JSON", path.display()))
    }
}
