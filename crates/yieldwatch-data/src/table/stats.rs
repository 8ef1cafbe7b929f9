//! Per-ticker yield statistics table

use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};
use yieldwatch_core::amount::parse_amount;
use yieldwatch_core::yields::round_to;
use yieldwatch_core::{Lookup, MissingReason, YieldStatistics};

use super::{Columns, csv_reader, ensure_parent, field, format_opt};
use crate::error::Result;
use crate::symbols::lookup_variants;

pub const TICKER: &str = "Ticker";
pub const MEDIAN: &str = "Median Annualized Yield %";
pub const MEAN: &str = "Mean Annualized Yield %";
pub const STD_DEV: &str = "Std Dev %";

const HEADER: [&str; 4] = [TICKER, MEDIAN, MEAN, STD_DEV];

/// Headers written by earlier versions of the tracker
const LEGACY_HEADERS: [(&str, &str); 3] = [
    ("Average Yield %", MEDIAN),
    ("Mean Yield %", MEAN),
    ("Std Deviation", STD_DEV),
];

/// Statistics keyed by ticker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsStore {
    records: Vec<YieldStatistics>,
    index: HashMap<String, usize>,
}

impl StatsStore {
    /// Build a store from computed statistics, keeping their order
    pub fn from_records(records: Vec<YieldStatistics>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, s)| (s.ticker.clone(), i))
            .collect();
        Self { records, index }
    }

    /// Load a statistics file
    ///
    /// A missing file, an unreadable file or one without the expected columns
    /// gives `None`: the caller treats every ticker as having no history
    /// rather than trusting part of a file.
    pub fn load(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Statistics file not found");
            return None;
        }

        match Self::read(path) {
            Ok(Some(store)) => {
                info!(path = %path.display(), tickers = store.len(), "Loaded yield statistics");
                Some(store)
            },
            Ok(None) => {
                warn!(path = %path.display(), "Statistics file has an unexpected schema");
                None
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read statistics file");
                None
            },
        }
    }

    fn read(path: &Path) -> Result<Option<Self>> {
        let mut reader = csv_reader(path)?;
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| {
                let h = h.trim();
                LEGACY_HEADERS
                    .iter()
                    .find(|(legacy, _)| *legacy == h)
                    .map_or(h, |(_, current)| *current)
                    .to_string()
            })
            .collect();
        let columns = Columns::new(&csv::StringRecord::from(headers));

        let (Some(ticker), Some(median), Some(mean), Some(std_dev)) = (
            columns.position(TICKER),
            columns.position(MEDIAN),
            columns.position(MEAN),
            columns.position(STD_DEV),
        ) else {
            return Ok(None);
        };

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record?;
            let symbol = field(&record, Some(ticker));
            if symbol.is_empty() {
                continue;
            }
            records.push(YieldStatistics {
                ticker: symbol.to_string(),
                median_yield_pct: parse_amount(field(&record, Some(median))),
                mean_yield_pct: parse_amount(field(&record, Some(mean))),
                std_dev_pct: parse_amount(field(&record, Some(std_dev))),
            });
        }

        Ok(Some(Self::from_records(records)))
    }

    /// Write the statistics, values rounded to 3 places
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ensure_parent(path)?;

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(HEADER)?;
        for s in &self.records {
            writer.write_record([
                s.ticker.clone(),
                format_opt(s.median_yield_pct.map(|v| round_to(v, 3))),
                format_opt(s.mean_yield_pct.map(|v| round_to(v, 3))),
                format_opt(s.std_dev_pct.map(|v| round_to(v, 3))),
            ])?;
        }
        writer.flush()?;

        info!(path = %path.display(), tickers = self.len(), "Saved yield statistics");
        Ok(())
    }

    /// Exact-symbol lookup
    pub fn get(&self, ticker: &str) -> Option<&YieldStatistics> {
        self.index.get(ticker).map(|&i| &self.records[i])
    }

    /// Lookup trying the exchange variants of a symbol
    pub fn lookup(&self, ticker: &str, is_tsx: bool) -> Lookup<&YieldStatistics> {
        lookup_variants(ticker, is_tsx)
            .iter()
            .find_map(|variant| self.get(variant))
            .map_or(Lookup::Missing(MissingReason::NotFound), Lookup::Found)
    }

    pub fn records(&self) -> &[YieldStatistics] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn stats(ticker: &str, median: f64) -> YieldStatistics {
        YieldStatistics {
            ticker: ticker.to_string(),
            median_yield_pct: Some(median),
            mean_yield_pct: Some(median + 0.5),
            std_dev_pct: Some(1.0),
        }
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        assert!(StatsStore::load(dir.path().join("missing.csv")).is_none());
    }

    #[test]
    fn test_wrong_schema_is_absent() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Ticker,Median Annualized Yield %").unwrap();
        writeln!(file, "ZWC,7.5").unwrap();
        assert!(StatsStore::load(file.path()).is_none());
    }

    #[test]
    fn test_legacy_headers_are_renamed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Ticker,Average Yield %,Mean Yield %,Std Deviation").unwrap();
        writeln!(file, "ZWC,7.5,7.8,0.9").unwrap();
        writeln!(file, "HMAX,,,").unwrap();

        let store = StatsStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        let zwc = store.get("ZWC").unwrap();
        assert_eq!(zwc.median_yield_pct, Some(7.5));
        assert_eq!(zwc.mean_yield_pct, Some(7.8));
        assert_eq!(zwc.std_dev_pct, Some(0.9));
        assert_eq!(store.get("HMAX").unwrap().std_dev_pct, None);
    }

    #[test]
    fn test_lookup_tries_tsx_variants() {
        let store = StatsStore::from_records(vec![stats("ZWC.TO", 7.0), stats("HMAX", 14.0)]);

        assert!(store.lookup("ZWC", true).is_found());
        assert!(store.lookup("HMAX.TO", true).is_found());
        assert!(!store.lookup("ZWC", false).is_found());
        assert!(!store.lookup("JEPI", false).is_found());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.csv");

        let mut record = stats("JEPI", 7.123_456);
        record.std_dev_pct = None;
        StatsStore::from_records(vec![record]).save(&path).unwrap();

        let store = StatsStore::load(&path).unwrap();
        let jepi = store.get("JEPI").unwrap();
        assert_eq!(jepi.median_yield_pct, Some(7.123));
        assert_eq!(jepi.std_dev_pct, None);
    }
}
