//! Daily current-yield report

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use yieldwatch_core::yields::{annualized_yield_pct, round_to};
use yieldwatch_core::{Frequency, Lookup, ValuationLabeler};

use super::RegionSummary;
use crate::api::{DividendSource, PriceSource};
use crate::config::{Region, TrackerConfig};
use crate::error::Result;
use crate::symbols::{lookup_variants, yahoo_symbol};
use crate::table::{CurrentYieldRow, HistoryTable, StatsStore, load_ticker_list};

/// Builds the current-yield report for a region
pub struct DailyTracker<P, D> {
    prices: P,
    dividends: D,
    config: Arc<TrackerConfig>,
    labeler: ValuationLabeler,
}

impl<P: PriceSource, D: DividendSource> DailyTracker<P, D> {
    pub fn new(prices: P, dividends: D, config: Arc<TrackerConfig>) -> Self {
        let labeler = ValuationLabeler::new(&config.analysis);
        Self {
            prices,
            dividends,
            config,
            labeler,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Price, profile, last dividend and current yield for one ticker
    ///
    /// The frequency comes from the history table when it knows the ticker,
    /// then from the dividend source's own label, and is `Unknown` otherwise.
    pub async fn snapshot(
        &self,
        ticker: &str,
        is_tsx: bool,
        frequencies: &HashMap<String, Frequency>,
        now: DateTime<Utc>,
    ) -> CurrentYieldRow {
        let symbol = yahoo_symbol(ticker, is_tsx);
        let mut row = CurrentYieldRow::empty(ticker, now);

        row.price = self.prices.latest_price(&symbol).await.into_option();
        if let Lookup::Found(profile) = self.prices.profile(&symbol).await {
            row.name = profile.name;
            row.currency = profile.currency;
        }

        let mut reported = None;
        match self.dividends.dividend_history(&symbol).await {
            Lookup::Found(history) => {
                if let Some((date, amount)) = history.latest() {
                    row.last_dividend_date = Some(date);
                    row.last_dividend = amount;
                }
                reported = history.reported_frequency;
            },
            Lookup::Missing(reason) => debug!(ticker, %reason, "No dividend data"),
        }

        row.frequency = lookup_variants(ticker, is_tsx)
            .iter()
            .find_map(|variant| frequencies.get(variant).copied())
            .or_else(|| reported.as_deref().and_then(Frequency::parse_label))
            .unwrap_or(Frequency::Unknown);

        row.current_yield_pct =
            annualized_yield_pct(row.last_dividend, row.frequency, row.price).map(|v| round_to(v, 3));
        row
    }

    /// Snapshot every ticker in the region, merge statistics and label
    ///
    /// Rows are sorted by current yield, highest first.
    pub async fn build_report(&self, region: &Region) -> Result<Vec<CurrentYieldRow>> {
        let tickers = load_ticker_list(&region.ticker_file);
        let frequencies = match HistoryTable::load_or_default(&region.history_csv) {
            Ok(table) => table.frequency_map(),
            Err(e) => {
                warn!(path = %region.history_csv.display(), error = %e, "Ignoring history table");
                HashMap::new()
            },
        };
        let stats = StatsStore::load(&region.stats_csv);

        info!(region = %region.name, tickers = tickers.len(), "Building current-yield report");

        let now = Utc::now();
        let mut rows = Vec::with_capacity(tickers.len());
        for ticker in &tickers {
            let row = self.snapshot(ticker, region.is_tsx, &frequencies, now).await;
            let ticker_stats = stats
                .as_ref()
                .and_then(|store| store.lookup(ticker, region.is_tsx).into_option());

            let mut row = row.with_statistics(ticker_stats);
            row.valuation = self.labeler.label(row.current_yield_pct, ticker_stats);
            rows.push(row);
        }

        CurrentYieldRow::sort(&mut rows);
        Ok(rows)
    }

    /// Build and save the region's report
    pub async fn refresh_region(&self, region: &Region) -> Result<RegionSummary> {
        let rows = self.build_report(region).await?;
        CurrentYieldRow::write_all(&rows, &region.report_csv)?;

        let mut summary = RegionSummary::new(&region.name);
        summary.tickers = rows.len();
        summary.rows_written = rows.len();
        summary.failed = rows
            .iter()
            .filter(|row| row.price.is_none())
            .map(|row| row.ticker.clone())
            .collect();
        Ok(summary)
    }
}
