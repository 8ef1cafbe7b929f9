//! Incremental dividend history collection

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};
use yieldwatch_core::stats::summarize_all;
use yieldwatch_core::yields::{annualized_yield_pct, round_to};
use yieldwatch_core::{Frequency, FrequencyEngine, Lookup};

use super::RegionSummary;
use crate::api::{DividendSource, PriceSource};
use crate::config::{Region, TrackerConfig};
use crate::error::Result;
use crate::symbols::yahoo_symbol;
use crate::table::{HistoryRow, HistoryTable, StatsStore, load_ticker_list};

/// Appends new dividend payments to a region's history table and refreshes
/// its yield statistics
pub struct HistoryTracker<P, D> {
    prices: P,
    dividends: D,
    config: Arc<TrackerConfig>,
    engine: FrequencyEngine,
}

impl<P: PriceSource, D: DividendSource> HistoryTracker<P, D> {
    pub fn new(prices: P, dividends: D, config: Arc<TrackerConfig>) -> Self {
        let engine = FrequencyEngine::new(&config.analysis);
        Self {
            prices,
            dividends,
            config,
            engine,
        }
    }

    /// Rows for payments after `since`
    ///
    /// The annualized yield uses the source-reported cadence; it is replaced
    /// once the whole table has been through the inference engine. Payments
    /// without an amount or an ex-date price are skipped.
    pub async fn fetch_new_rows(&self, ticker: &str, is_tsx: bool, since: Option<NaiveDate>) -> Lookup<Vec<HistoryRow>> {
        let symbol = yahoo_symbol(ticker, is_tsx);
        let history = match self.dividends.dividend_history(&symbol).await {
            Lookup::Found(history) => history,
            Lookup::Missing(reason) => return Lookup::Missing(reason),
        };

        let frequency = Frequency::normalize(history.reported_frequency.as_deref(), self.config.analysis.unknown_policy);
        let mut rows = Vec::new();

        for event in history.to_events(ticker) {
            if since.is_some_and(|latest| event.ex_date <= latest) {
                continue;
            }
            if event.amount.is_none() {
                debug!(ticker, ex_date = %event.ex_date, "Skipping payment without amount");
                continue;
            }

            let price = match self.prices.price_on(&symbol, event.ex_date).await {
                Lookup::Found(price) => price,
                Lookup::Missing(reason) => {
                    debug!(ticker, ex_date = %event.ex_date, %reason, "Skipping payment without price");
                    continue;
                },
            };

            rows.push(HistoryRow {
                ticker: ticker.to_string(),
                ex_date: event.ex_date,
                dividend: event.amount,
                price: Some(round_to(price, 3)),
                annualized_yield_pct: annualized_yield_pct(event.amount, frequency, Some(price)).map(|v| round_to(v, 3)),
                frequency,
                source: Some(history.source.clone()),
            });
        }

        Lookup::Found(rows)
    }

    /// Update the region's history table and statistics file
    pub async fn refresh_region(&self, region: &Region) -> Result<RegionSummary> {
        let tickers = load_ticker_list(&region.ticker_file);
        let mut table = HistoryTable::load_or_default(&region.history_csv)?;
        let mut summary = RegionSummary::new(&region.name);
        summary.tickers = tickers.len();

        info!(region = %region.name, tickers = tickers.len(), "Refreshing dividend history");

        for ticker in &tickers {
            let since = table.latest_ex_date(ticker);
            match self.fetch_new_rows(ticker, region.is_tsx, since).await {
                Lookup::Found(rows) => {
                    debug!(ticker = %ticker, new_rows = rows.len(), "Fetched history");
                    summary.rows_written += rows.len();
                    table.merge(rows);
                },
                Lookup::Missing(reason) => {
                    warn!(ticker = %ticker, %reason, "No dividend history");
                    summary.failed.push(ticker.clone());
                },
            }
        }

        summary.relabeled = table.apply_inference(&self.engine);
        table.save(&region.history_csv)?;

        let stats = summarize_all(table.yield_samples(), self.config.analysis.band_center);
        StatsStore::from_records(stats).save(&region.stats_csv)?;

        info!(
            region = %region.name,
            new_rows = summary.rows_written,
            relabeled = summary.relabeled,
            failed = summary.failed.len(),
            "Dividend history refreshed"
        );
        Ok(summary)
    }
}
