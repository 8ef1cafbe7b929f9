//! Current-yield report

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use yieldwatch_core::stats::descending_missing_last;
use yieldwatch_core::{Frequency, Valuation, YieldStatistics};

use super::ensure_parent;
use crate::error::Result;

/// One ticker's line in the current-yield report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentYieldRow {
    #[serde(rename = "Last Updated (UTC)")]
    pub last_updated: String,
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Price")]
    pub price: Option<f64>,
    #[serde(rename = "Currency")]
    pub currency: Option<String>,
    #[serde(rename = "Last Dividend")]
    pub last_dividend: Option<f64>,
    #[serde(rename = "Last Dividend Date")]
    pub last_dividend_date: Option<NaiveDate>,
    #[serde(rename = "Frequency")]
    pub frequency: Frequency,
    #[serde(rename = "Current Yield (%)")]
    pub current_yield_pct: Option<f64>,
    #[serde(rename = "Median Annualized Yield %")]
    pub median_yield_pct: Option<f64>,
    #[serde(rename = "Mean Annualized Yield %")]
    pub mean_yield_pct: Option<f64>,
    #[serde(rename = "Std Dev %")]
    pub std_dev_pct: Option<f64>,
    #[serde(rename = "Valuation")]
    pub valuation: Valuation,
}

impl CurrentYieldRow {
    /// An empty row for a ticker, stamped with `now`
    pub fn empty(ticker: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            last_updated: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            ticker: ticker.into(),
            name: None,
            price: None,
            currency: None,
            last_dividend: None,
            last_dividend_date: None,
            frequency: Frequency::Unknown,
            current_yield_pct: None,
            median_yield_pct: None,
            mean_yield_pct: None,
            std_dev_pct: None,
            valuation: Valuation::Unknown,
        }
    }

    /// Copy the historical statistics columns
    pub fn with_statistics(mut self, stats: Option<&YieldStatistics>) -> Self {
        self.median_yield_pct = stats.and_then(|s| s.median_yield_pct);
        self.mean_yield_pct = stats.and_then(|s| s.mean_yield_pct);
        self.std_dev_pct = stats.and_then(|s| s.std_dev_pct);
        self
    }

    /// Sort by current yield, highest first, missing last
    pub fn sort(rows: &mut [Self]) {
        rows.sort_by(|a, b| descending_missing_last(a.current_yield_pct, b.current_yield_pct));
    }

    /// Write a report
    pub fn write_all(rows: &[Self], path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ensure_parent(path)?;

        let mut writer = csv::Writer::from_path(path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = rows.len(), "Saved current-yield report");
        Ok(())
    }

    /// Read a report back
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        let mut reader = csv::Reader::from_path(path)?;
        let rows = reader.deserialize().collect::<std::result::Result<Vec<Self>, _>>()?;
        Ok(rows)
    }
}
