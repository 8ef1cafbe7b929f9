//! Per-ticker statistics over historical annualized yields

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, Statistics};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::valuation::BandCenter;

/// Aggregate of one ticker's annualized-yield samples, in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldStatistics {
    pub ticker: String,
    pub median_yield_pct: Option<f64>,
    pub mean_yield_pct: Option<f64>,
    pub std_dev_pct: Option<f64>,
}

impl YieldStatistics {
    /// Statistics with no samples behind them
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            median_yield_pct: None,
            mean_yield_pct: None,
            std_dev_pct: None,
        }
    }

    /// Band centre for the given configuration
    pub fn center(&self, center: BandCenter) -> Option<f64> {
        match center {
            BandCenter::Median => self.median_yield_pct,
            BandCenter::Mean => self.mean_yield_pct,
        }
    }
}

/// Summarise one ticker's samples, skipping missing and non-finite values
///
/// The standard deviation is the sample estimate (n-1 denominator) and is
/// missing with fewer than two samples.
pub fn summarize(ticker: impl Into<String>, samples: impl IntoIterator<Item = Option<f64>>) -> YieldStatistics {
    let values: Vec<f64> = samples.into_iter().flatten().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return YieldStatistics::empty(ticker);
    }

    let mean = values.iter().mean();
    let std_dev = if values.len() > 1 { Some(values.iter().std_dev()) } else { None };
    let median = Data::new(values).median();

    YieldStatistics {
        ticker: ticker.into(),
        median_yield_pct: Some(median).filter(|v| v.is_finite()),
        mean_yield_pct: Some(mean).filter(|v| v.is_finite()),
        std_dev_pct: std_dev.filter(|v| v.is_finite()),
    }
}

/// Summarise `(ticker, annualized yield)` rows, one record per ticker
///
/// Records are sorted by the band centre, highest first, tickers without a
/// centre last.
pub fn summarize_all<'a>(
    rows: impl IntoIterator<Item = (&'a str, Option<f64>)>,
    center: BandCenter,
) -> Vec<YieldStatistics> {
    let mut samples: BTreeMap<&str, Vec<Option<f64>>> = BTreeMap::new();
    for (ticker, value) in rows {
        samples.entry(ticker).or_default().push(value);
    }

    let mut stats: Vec<YieldStatistics> = samples
        .into_iter()
        .map(|(ticker, values)| summarize(ticker, values))
        .collect();

    stats.sort_by(|a, b| descending_missing_last(a.center(center), b.center(center)));
    stats
}

/// Ordering for "highest first, missing last"
pub fn descending_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
