//! Raw dividend listings pasted from screener pages
//!
//! The input is plain text in 4-line blocks: ticker, company name, yield and
//! ex-dividend date. Blank lines are ignored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};
use yieldwatch_core::stats::descending_missing_last;

use super::ensure_parent;
use crate::error::Result;

/// Accepted ex-date layouts, tried in order
pub(crate) const DATE_FORMATS: [&str; 6] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%m/%d/%Y", "%m-%d-%Y"];

/// One parsed listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRow {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Company Name")]
    pub company: String,
    /// Yield as written in the source
    #[serde(rename = "Yield")]
    pub yield_text: String,
    /// ISO date when recognised, otherwise the source text
    #[serde(rename = "Ex-Dividend Date")]
    pub ex_date: String,
    #[serde(rename = "Yield_Value")]
    pub yield_value: Option<f64>,
}

/// Parsed rows and the number of malformed blocks skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub rows: Vec<ListingRow>,
    pub skipped: usize,
}

/// Numeric value of a yield such as `"7.45 %"` or `"1,234.5%"`
pub fn clean_yield(text: &str) -> Option<f64> {
    let core: String = text.trim().chars().filter(|c| !matches!(c, ',' | ' ')).collect();
    let core = core.trim_end_matches('%');
    if core.is_empty() {
        return None;
    }
    core.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalise a date to `YYYY-MM-DD`; the first matching format wins
pub fn clean_date(text: &str) -> String {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .map_or_else(|| text.to_string(), |date| date.format("%Y-%m-%d").to_string())
}

/// Parse listing text, sorted by numeric yield with missing values last
pub fn parse_listing(text: &str) -> Listing {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let mut listing = Listing::default();

    for block in lines.chunks(4) {
        let &[ticker, company, yield_text, ex_date] = block else {
            warn!(?block, "Skipping malformed listing block");
            listing.skipped += 1;
            continue;
        };

        listing.rows.push(ListingRow {
            ticker: ticker.to_string(),
            company: company.to_string(),
            yield_text: yield_text.to_string(),
            ex_date: clean_date(ex_date),
            yield_value: clean_yield(yield_text),
        });
    }

    listing
        .rows
        .sort_by(|a, b| descending_missing_last(a.yield_value, b.yield_value));
    listing
}

/// Write parsed rows as CSV
pub fn write_listing(rows: &[ListingRow], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "Wrote dividend listing");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
ZWC
BMO Canadian High Dividend Covered Call ETF
7.45%

2024-04-26
HMAX
Hamilton Canadian Financials Yield Maximizer
14.1 %
25/04/2024
XYZ
Mystery Corp
n/a
soon
TRUNC
Truncated Inc
";

    #[test]
    fn test_clean_yield() {
        assert_eq!(clean_yield("7.45%"), Some(7.45));
        assert_eq!(clean_yield(" 1,234.5 % "), Some(1234.5));
        assert_eq!(clean_yield("n/a"), None);
        assert_eq!(clean_yield("%"), None);
    }

    #[test]
    fn test_clean_date_formats() {
        assert_eq!(clean_date("2024-04-26"), "2024-04-26");
        assert_eq!(clean_date("2024/04/26"), "2024-04-26");
        assert_eq!(clean_date("26-04-2024"), "2024-04-26");
        assert_eq!(clean_date("04/26/2024"), "2024-04-26");
        // day-first wins when both readings are valid
        assert_eq!(clean_date("03/04/2024"), "2024-04-03");
        assert_eq!(clean_date("next week"), "next week");
    }

    #[test]
    fn test_parse_listing() {
        let listing = parse_listing(SAMPLE);
        assert_eq!(listing.skipped, 1);

        let tickers: Vec<&str> = listing.rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["HMAX", "ZWC", "XYZ"]);
        assert_eq!(listing.rows[0].ex_date, "2024-04-25");
        assert_eq!(listing.rows[0].yield_text, "14.1 %");
        assert_eq!(listing.rows[2].yield_value, None);
        assert_eq!(listing.rows[2].ex_date, "soon");
    }

    #[test]
    fn test_write_listing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("listing.csv");
        write_listing(&parse_listing(SAMPLE).rows, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Ticker,Company Name,Yield,Ex-Dividend Date,Yield_Value"));
        assert_eq!(
            lines.next(),
            Some("HMAX,Hamilton Canadian Financials Yield Maximizer,14.1 %,2024-04-25,14.1")
        );
        assert_eq!(lines.last(), Some("XYZ,Mystery Corp,n/a,soon,"));
    }
}
