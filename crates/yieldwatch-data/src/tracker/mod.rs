//! Batch trackers run once per region

pub mod daily;
pub mod history;

use serde::{Deserialize, Serialize};

pub use daily::DailyTracker;
pub use history::HistoryTracker;

/// Outcome of processing one region
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub region: String,
    /// Tickers read from the region's ticker list
    pub tickers: usize,
    /// History rows added, or report rows written
    pub rows_written: usize,
    /// History rows whose frequency label changed
    pub relabeled: usize,
    /// Tickers the sources returned nothing usable for
    pub failed: Vec<String>,
}

impl RegionSummary {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }
}
