//! Data collaborators and batch trackers for yieldwatch
//!
//! This crate connects the pure logic in `yieldwatch-core` to the outside
//! world:
//!
//! - Price and dividend sources behind async traits (Yahoo Finance by default)
//! - An injected `(symbol, date)` price cache, in memory or backed by a JSON file
//! - CSV tables: dividend history, yield statistics, current-yield reports
//!   and raw dividend listings
//! - Trackers that run a region's tickers through fetch → inference →
//!   statistics → valuation
//!
//! Collaborator failures are reported as `Lookup::Missing` values; only file
//! and configuration problems surface as `DataError`.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use yieldwatch_data::{DailyTracker, JsonFilePriceCache, TrackerConfig, YahooFinanceClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(TrackerConfig::default());
//!     let yahoo = YahooFinanceClient::new(&config)?;
//!     let tracker = DailyTracker::new(yahoo.clone(), yahoo, Arc::clone(&config));
//!
//!     for region in &config.regions {
//!         let rows = tracker.build_report(region).await?;
//!         println!("{}: {} tickers", region.name, rows.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod symbols;
pub mod table;
pub mod tracker;

// Re-export main types for convenience
pub use api::{CachedPriceSource, DividendHistory, DividendSource, PriceSource, QuoteProfile, YahooFinanceClient};
pub use cache::{JsonFilePriceCache, MemoryPriceCache, PriceCache, PriceKey};
pub use config::{Region, TrackerConfig};
pub use error::{DataError, Result};
pub use table::{CurrentYieldRow, HistoryRow, HistoryTable, StatsStore};
pub use tracker::{DailyTracker, HistoryTracker, RegionSummary};
