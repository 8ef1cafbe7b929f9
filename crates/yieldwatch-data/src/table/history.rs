//! Dividend history table
//!
//! One row per `(ticker, ex_date)`. The table is rewritten in full on every
//! save with the fixed column layout below; unknown columns are not kept.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{info, warn};
use yieldwatch_core::amount::parse_amount;
use yieldwatch_core::yields::{annualized_yield_pct, round_to};
use yieldwatch_core::{DividendEvent, Frequency, FrequencyEngine};

use super::{Columns, csv_reader, ensure_parent, field, format_opt, parse_date};
use crate::error::Result;

pub const TICKER: &str = "Ticker";
pub const EX_DATE: &str = "Ex-Div Date";
pub const DIVIDEND: &str = "Dividend";
pub const PRICE: &str = "Price on Ex-Date";
pub const ANNUALIZED_YIELD: &str = "Annualized Yield %";
pub const FREQUENCY: &str = "Frequency";
pub const SOURCE: &str = "Source";

const HEADER: [&str; 7] = [TICKER, EX_DATE, DIVIDEND, PRICE, ANNUALIZED_YIELD, FREQUENCY, SOURCE];

/// One persisted dividend payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub ticker: String,
    pub ex_date: NaiveDate,
    pub dividend: Option<f64>,
    pub price: Option<f64>,
    pub annualized_yield_pct: Option<f64>,
    pub frequency: Frequency,
    pub source: Option<String>,
}

impl HistoryRow {
    pub fn to_event(&self) -> DividendEvent {
        DividendEvent::new(self.ticker.clone(), self.ex_date, self.dividend)
    }

    fn to_record(&self) -> [String; 7] {
        [
            self.ticker.clone(),
            self.ex_date.format("%Y-%m-%d").to_string(),
            format_opt(self.dividend),
            format_opt(self.price),
            format_opt(self.annualized_yield_pct.map(|v| round_to(v, 3))),
            self.frequency.label().to_string(),
            self.source.clone().unwrap_or_default(),
        ]
    }
}

/// Dividend history for any number of tickers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryTable {
    rows: BTreeMap<(String, NaiveDate), HistoryRow>,
}

impl HistoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table; `Ticker`, `Ex-Div Date` and `Dividend` are required
    ///
    /// Rows without a ticker or with an unparseable date are dropped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv_reader(path)?;
        let columns = Columns::new(reader.headers()?);

        let ticker_col = Some(columns.require(TICKER, path)?);
        let date_col = Some(columns.require(EX_DATE, path)?);
        let dividend_col = Some(columns.require(DIVIDEND, path)?);
        let price_col = columns.position(PRICE);
        let yield_col = columns.position(ANNUALIZED_YIELD);
        let frequency_col = columns.position(FREQUENCY);
        let source_col = columns.position(SOURCE);

        let mut table = Self::new();
        let mut dropped = 0_usize;

        for record in reader.records() {
            let record = record?;
            let ticker = field(&record, ticker_col);
            let raw_date = field(&record, date_col);

            let Some(ex_date) = parse_date(raw_date).filter(|_| !ticker.is_empty()) else {
                warn!(path = %path.display(), ticker, date = raw_date, "Dropping history row");
                dropped += 1;
                continue;
            };

            let source = field(&record, source_col);
            table.insert(HistoryRow {
                ticker: ticker.to_string(),
                ex_date,
                dividend: parse_amount(field(&record, dividend_col)),
                price: parse_amount(field(&record, price_col)),
                annualized_yield_pct: parse_amount(field(&record, yield_col)),
                frequency: Frequency::parse_label(field(&record, frequency_col)).unwrap_or(Frequency::Unknown),
                source: (!source.is_empty()).then(|| source.to_string()),
            });
        }

        info!(path = %path.display(), rows = table.len(), dropped, "Loaded history table");
        Ok(table)
    }

    /// Load a table, starting empty when the file does not exist yet
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() { Self::load(path) } else { Ok(Self::new()) }
    }

    /// Write the table, sorted by ticker then ex-date
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ensure_parent(path)?;

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(HEADER)?;
        for row in self.rows.values() {
            writer.write_record(row.to_record())?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = self.len(), "Saved history table");
        Ok(())
    }

    /// Insert a row, replacing any row with the same `(ticker, ex_date)`
    pub fn insert(&mut self, row: HistoryRow) {
        self.rows.insert((row.ticker.clone(), row.ex_date), row);
    }

    /// Merge rows into the table; later rows win on `(ticker, ex_date)`
    pub fn merge(&mut self, rows: impl IntoIterator<Item = HistoryRow>) {
        for row in rows {
            self.insert(row);
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in ticker, ex-date order
    pub fn rows(&self) -> impl Iterator<Item = &HistoryRow> {
        self.rows.values()
    }

    /// Rows for one ticker in ex-date order
    pub fn rows_for<'a>(&'a self, ticker: &'a str) -> impl Iterator<Item = &'a HistoryRow> + 'a {
        self.rows.values().filter(move |row| row.ticker == ticker)
    }

    /// Most recent ex-date stored for a ticker
    pub fn latest_ex_date(&self, ticker: &str) -> Option<NaiveDate> {
        self.rows_for(ticker).map(|row| row.ex_date).max()
    }

    /// Most recent known frequency per ticker
    pub fn frequency_map(&self) -> HashMap<String, Frequency> {
        let mut map = HashMap::new();
        for row in self.rows.values().filter(|row| row.frequency != Frequency::Unknown) {
            // rows iterate in ex-date order within a ticker, so later rows overwrite
            map.insert(row.ticker.clone(), row.frequency);
        }
        map
    }

    /// Dividend events for the inference engine
    pub fn events(&self) -> Vec<DividendEvent> {
        self.rows.values().map(HistoryRow::to_event).collect()
    }

    /// Relabel every row and recompute its annualized yield
    ///
    /// Rows without a price get no yield. Returns the number of rows whose frequency changed.
    pub fn apply_inference(&mut self, engine: &FrequencyEngine) -> usize {
        let mut changed = 0;

        for classified in engine.infer_table(self.events()) {
            let key = (classified.event.ticker, classified.event.ex_date);
            let Some(row) = self.rows.get_mut(&key) else {
                continue;
            };

            if row.frequency != classified.frequency {
                changed += 1;
                row.frequency = classified.frequency;
            }
            row.annualized_yield_pct =
                annualized_yield_pct(row.dividend, row.frequency, row.price).map(|v| round_to(v, 3));
        }

        changed
    }

    /// `(ticker, annualized yield)` samples for statistics
    pub fn yield_samples(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.rows
            .values()
            .map(|row| (row.ticker.as_str(), row.annualized_yield_pct))
    }
}
