//! CSV tables persisted between runs

pub mod history;
pub mod listing;
pub mod report;
pub mod stats;
pub mod tickers;

use chrono::NaiveDate;
use csv::StringRecord;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{DataError, Result};

pub use history::{HistoryRow, HistoryTable};
pub use listing::{ListingRow, parse_listing, write_listing};
pub use report::CurrentYieldRow;
pub use stats::StatsStore;
pub use tickers::load_ticker_list;

/// Header name → column position
pub(crate) struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    pub(crate) fn new(headers: &StringRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();
        Self { index }
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn require(&self, name: &str, path: &Path) -> Result<usize> {
        self.position(name).ok_or_else(|| DataError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
    }
}

/// Field text at an optional column, empty when the column or cell is absent
pub(crate) fn field(record: &StringRecord, column: Option<usize>) -> &str {
    column.and_then(|i| record.get(i)).map_or("", str::trim)
}

/// Parse an ex-date in any of the listing layouts, tolerating a trailing time component
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let parse = |candidate: &str| {
        listing::DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
    };
    parse(text).or_else(|| text.get(..10).and_then(parse))
}

/// Empty string for missing values
pub(crate) fn format_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub(crate) fn csv_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?)
}

/// Create the parent directory of an output file if needed
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 28);
        assert_eq!(parse_date("2024-03-28"), expected);
        assert_eq!(parse_date(" 2024-03-28 00:00:00 "), expected);
        assert_eq!(parse_date("2024/03/28"), expected);
        assert_eq!(parse_date("28/03/2024"), expected);
        assert_eq!(parse_date("03/28/2024"), expected);
        assert_eq!(parse_date("03-28-2024 00:00"), expected);
        assert_eq!(parse_date("March 28"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_columns() {
        let headers = StringRecord::from(vec!["Ticker", " Dividend "]);
        let columns = Columns::new(&headers);
        assert_eq!(columns.position("Dividend"), Some(1));

        let err = columns.require("Ex-Div Date", Path::new("h.csv")).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { ref column, .. } if column == "Ex-Div Date"));
    }

    #[test]
    fn test_format_opt() {
        assert_eq!(format_opt(Some(0.125)), "0.125");
        assert_eq!(format_opt(None), "");
    }
}
