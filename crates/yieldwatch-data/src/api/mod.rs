//! Price and dividend sources

pub mod yahoo;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use yieldwatch_core::{DividendEvent, Lookup};

use crate::cache::{PriceCache, PriceKey};

pub use yahoo::YahooFinanceClient;

/// Descriptive data about a quoted security
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteProfile {
    pub name: Option<String>,
    pub currency: Option<String>,
}

/// A security's dividend history as reported by a source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DividendHistory {
    /// `(ex_date, amount)` pairs, in the order the source returned them
    pub events: Vec<(NaiveDate, Option<f64>)>,
    /// Cadence text published by the source, if any
    pub reported_frequency: Option<String>,
    /// Source name written to the history table
    pub source: String,
}

impl DividendHistory {
    /// Most recent payment
    pub fn latest(&self) -> Option<(NaiveDate, Option<f64>)> {
        self.events.iter().max_by_key(|(date, _)| *date).copied()
    }

    /// Events attributed to `ticker`, sorted by ex-date
    pub fn to_events(&self, ticker: &str) -> Vec<DividendEvent> {
        let mut events: Vec<DividendEvent> = self
            .events
            .iter()
            .map(|(date, amount)| DividendEvent::new(ticker, *date, *amount))
            .collect();
        events.sort_by_key(|e| e.ex_date);
        events
    }
}

/// Source of current and historical prices
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Most recent trade price
    async fn latest_price(&self, symbol: &str) -> Lookup<f64>;

    /// Closing price on a given date
    async fn price_on(&self, symbol: &str, date: NaiveDate) -> Lookup<f64>;

    /// Name and currency
    async fn profile(&self, symbol: &str) -> Lookup<QuoteProfile>;
}

/// Source of dividend histories
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DividendSource: Send + Sync {
    /// Full payment history; an empty history is `Found` with no events
    async fn dividend_history(&self, symbol: &str) -> Lookup<DividendHistory>;
}

#[async_trait]
impl<T: PriceSource + ?Sized> PriceSource for Arc<T> {
    async fn latest_price(&self, symbol: &str) -> Lookup<f64> {
        (**self).latest_price(symbol).await
    }

    async fn price_on(&self, symbol: &str, date: NaiveDate) -> Lookup<f64> {
        (**self).price_on(symbol, date).await
    }

    async fn profile(&self, symbol: &str) -> Lookup<QuoteProfile> {
        (**self).profile(symbol).await
    }
}

#[async_trait]
impl<T: DividendSource + ?Sized> DividendSource for Arc<T> {
    async fn dividend_history(&self, symbol: &str) -> Lookup<DividendHistory> {
        (**self).dividend_history(symbol).await
    }
}

/// Wraps a price source with an injected `(symbol, date)` cache
pub struct CachedPriceSource<S> {
    inner: S,
    cache: Arc<dyn PriceCache>,
}

impl<S: PriceSource> CachedPriceSource<S> {
    pub fn new(inner: S, cache: Arc<dyn PriceCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<S: PriceSource> PriceSource for CachedPriceSource<S> {
    async fn latest_price(&self, symbol: &str) -> Lookup<f64> {
        self.inner.latest_price(symbol).await
    }

    async fn price_on(&self, symbol: &str, date: NaiveDate) -> Lookup<f64> {
        let key = PriceKey::new(symbol, date);
        if let Some(price) = self.cache.get(&key).await {
            debug!(symbol, %date, "Price cache hit");
            return Lookup::Found(price);
        }

        debug!(symbol, %date, "Price cache miss");
        let lookup = self.inner.price_on(symbol, date).await;
        if let Lookup::Found(price) = lookup {
            self.cache.put(key, price).await;
        }
        lookup
    }

    async fn profile(&self, symbol: &str) -> Lookup<QuoteProfile> {
        self.inner.profile(symbol).await
    }
}
