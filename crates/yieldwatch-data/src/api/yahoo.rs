//! Yahoo Finance client
//!
//! Every call is rate limited, bounded by the configured timeout and retried
//! with exponential backoff. Failures that survive the retries come back as
//! `Lookup::Missing` so a single bad ticker never aborts a batch.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;
use yieldwatch_core::{Lookup, MissingReason};

use super::{DividendHistory, DividendSource, PriceSource, QuoteProfile};
use crate::config::TrackerConfig;
use crate::error::Result;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Source name written to the history table
pub const SOURCE_NAME: &str = "Yahoo Finance";

/// Yahoo Finance client implementing both [`PriceSource`] and [`DividendSource`]
#[derive(Clone)]
pub struct YahooFinanceClient {
    connector: Arc<yahoo::YahooConnector>,
    rate_limiter: SharedRateLimiter,
    config: Arc<TrackerConfig>,
}

impl YahooFinanceClient {
    /// Create a new client from tracker configuration
    pub fn new(config: &TrackerConfig) -> Result<Self> {
        let connector = yahoo::YahooConnector::new()?;
        let rate = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(rate)));

        Ok(Self {
            connector: Arc::new(connector),
            rate_limiter,
            config: Arc::new(config.clone()),
        })
    }

    /// Run a provider call with rate limiting, timeout and retries
    async fn call<T, F, Fut>(&self, what: &str, symbol: &str, mut op: F) -> std::result::Result<T, String>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = std::result::Result<T, yahoo::YahooError>> + Send,
        T: Send,
    {
        let mut last_error = String::new();
        let timeout = self.config.request_timeout;

        for attempt in 0..self.config.max_retries.max(1) {
            if attempt > 0 {
                let backoff = self.config.retry_backoff(attempt - 1);
                debug!(symbol, what, attempt, ?backoff, "Retrying Yahoo Finance call");
                tokio::time::sleep(backoff).await;
            }

            self.rate_limiter.until_ready().await;

            match tokio::time::timeout(timeout, op()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => last_error = e.to_string(),
                Err(_) => last_error = format!("timed out after {timeout:?}"),
            }
        }

        warn!(symbol, what, error = %last_error, "Yahoo Finance call failed");
        Err(last_error)
    }

    fn lookback_start(&self, now: OffsetDateTime) -> OffsetDateTime {
        now - time::Duration::days(i64::from(self.config.history_lookback_years) * 365)
    }
}

fn to_offset(date: NaiveDate) -> Option<OffsetDateTime> {
    let timestamp = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    OffsetDateTime::from_unix_timestamp(timestamp).ok()
}

fn to_date(timestamp: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

/// Provider fields are plain or optional strings depending on the endpoint
fn non_empty(value: impl Into<Option<String>>) -> Option<String> {
    value.into().filter(|s| !s.trim().is_empty())
}

fn valid_price(price: f64) -> Lookup<f64> {
    if price.is_finite() && price > 0.0 {
        Lookup::Found(price)
    } else {
        Lookup::Missing(MissingReason::Unparseable(price.to_string()))
    }
}

#[async_trait]
impl PriceSource for YahooFinanceClient {
    async fn latest_price(&self, symbol: &str) -> Lookup<f64> {
        let connector = self.connector.as_ref();
        let response = match self
            .call("latest_price", symbol, move || connector.get_latest_quotes(symbol, "1d"))
            .await
        {
            Ok(response) => response,
            Err(e) => return Lookup::unavailable(e),
        };

        match response.last_quote() {
            Ok(quote) => valid_price(quote.close),
            Err(_) => Lookup::Missing(MissingReason::NotFound),
        }
    }

    async fn price_on(&self, symbol: &str, date: NaiveDate) -> Lookup<f64> {
        let (Some(start), Some(end)) = (to_offset(date), to_offset(date + ChronoDuration::days(1))) else {
            return Lookup::Missing(MissingReason::Unparseable(date.to_string()));
        };

        let connector = self.connector.as_ref();
        let response = match self
            .call("price_on", symbol, move || connector.get_quote_history(symbol, start, end))
            .await
        {
            Ok(response) => response,
            Err(e) => return Lookup::unavailable(e),
        };

        match response.quotes() {
            Ok(quotes) => quotes
                .first()
                .map_or(Lookup::Missing(MissingReason::NotFound), |q| valid_price(q.close)),
            Err(_) => Lookup::Missing(MissingReason::NotFound),
        }
    }

    async fn profile(&self, symbol: &str) -> Lookup<QuoteProfile> {
        let connector = self.connector.as_ref();

        let currency = match self
            .call("profile", symbol, move || connector.get_latest_quotes(symbol, "1d"))
            .await
        {
            Ok(response) => response.metadata().ok().and_then(|meta| non_empty(meta.currency)),
            Err(e) => return Lookup::unavailable(e),
        };

        let name = match self.call("search", symbol, move || connector.search_ticker(symbol)).await {
            Ok(result) => result
                .quotes
                .into_iter()
                .find(|item| item.symbol.eq_ignore_ascii_case(symbol))
                .and_then(|item| non_empty(item.long_name).or_else(|| non_empty(item.short_name))),
            Err(_) => None,
        };

        Lookup::Found(QuoteProfile { name, currency })
    }
}

#[async_trait]
impl DividendSource for YahooFinanceClient {
    async fn dividend_history(&self, symbol: &str) -> Lookup<DividendHistory> {
        let end = OffsetDateTime::now_utc();
        let start = self.lookback_start(end);

        let connector = self.connector.as_ref();
        let response = match self
            .call("dividend_history", symbol, move || connector.get_quote_history(symbol, start, end))
            .await
        {
            Ok(response) => response,
            Err(e) => return Lookup::unavailable(e),
        };

        let dividends = match response.dividends() {
            Ok(dividends) => dividends,
            Err(e) => return Lookup::Missing(MissingReason::Unparseable(e.to_string())),
        };

        let mut events: Vec<(NaiveDate, Option<f64>)> = dividends
            .iter()
            .filter_map(|d| to_date(d.date as i64).map(|date| (date, Some(d.amount).filter(|a| a.is_finite()))))
            .collect();
        events.sort_by_key(|(date, _)| *date);

        debug!(symbol, count = events.len(), "Fetched dividend history");

        // Yahoo does not publish a cadence label
        Lookup::Found(DividendHistory {
            events,
            reported_frequency: None,
            source: SOURCE_NAME.to_string(),
        })
    }
}
