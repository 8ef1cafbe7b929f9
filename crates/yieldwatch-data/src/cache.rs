//! Price cache keyed by `(symbol, date)`
//!
//! The cache is injected into price lookups (see `CachedPriceSource`) rather
//! than held as process-wide state. The file-backed implementation keeps the
//! legacy `"SYMBOL_YYYY-MM-DD": price` JSON layout so existing side files keep
//! working.

use async_trait::async_trait;
use cached::{Cached, UnboundCache};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Cache key for a closing price on a given date
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PriceKey {
    /// Provider symbol (e.g. `ZWC.TO`)
    pub symbol: String,
    /// Trading date
    pub date: NaiveDate,
}

impl PriceKey {
    /// Create a new cache key
    pub fn new(symbol: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            date,
        }
    }

    /// `SYMBOL_YYYY-MM-DD`
    pub fn legacy_key(&self) -> String {
        format!("{}_{}", self.symbol, self.date.format("%Y-%m-%d"))
    }

    /// Parse a `SYMBOL_YYYY-MM-DD` key; the symbol may itself contain `_`
    pub fn parse_legacy(key: &str) -> Option<Self> {
        let (symbol, date) = key.rsplit_once('_')?;
        if symbol.is_empty() {
            return None;
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        Some(Self::new(symbol, date))
    }
}

/// Lookup/store interface for historical prices
#[async_trait]
pub trait PriceCache: Send + Sync {
    /// Get a cached price
    async fn get(&self, key: &PriceKey) -> Option<f64>;

    /// Store a price
    async fn put(&self, key: PriceKey, price: f64);

    /// Number of cached prices
    async fn len(&self) -> usize;

    /// Check if the cache is empty
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// In-memory price cache for a single run
pub struct MemoryPriceCache {
    cache: Arc<RwLock<UnboundCache<PriceKey, f64>>>,
}

impl MemoryPriceCache {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(RwLock::new(UnboundCache::new())),
        }
    }
}

impl Default for MemoryPriceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryPriceCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

#[async_trait]
impl PriceCache for MemoryPriceCache {
    async fn get(&self, key: &PriceKey) -> Option<f64> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).copied()
    }

    async fn put(&self, key: PriceKey, price: f64) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, price);
    }

    async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }
}

/// Price cache persisted to a JSON side file between runs
pub struct JsonFilePriceCache {
    path: PathBuf,
    entries: RwLock<BTreeMap<PriceKey, f64>>,
}

impl JsonFilePriceCache {
    /// Open the cache at `path`
    ///
    /// A missing file starts an empty cache. An unreadable or malformed file
    /// is logged and also starts empty; it is overwritten on the next flush.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => {
                debug!(path = %path.display(), entries = entries.len(), "Loaded price cache");
                entries
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable price cache");
                BTreeMap::new()
            },
        };

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<PriceKey, f64>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let raw = std::fs::read_to_string(path)?;
        let legacy: BTreeMap<String, f64> = serde_json::from_str(&raw)?;

        let mut entries = BTreeMap::new();
        for (key, price) in legacy {
            match PriceKey::parse_legacy(&key) {
                Some(parsed) if price.is_finite() => {
                    entries.insert(parsed, price);
                },
                _ => debug!(key = %key, "Skipping malformed price cache entry"),
            }
        }
        Ok(entries)
    }

    /// Path of the side file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all entries back to the side file
    pub async fn flush(&self) -> Result<()> {
        let entries = self.entries.read().await;
        let legacy: BTreeMap<String, f64> = entries.iter().map(|(k, v)| (k.legacy_key(), *v)).collect();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string(&legacy)?)?;
        info!(path = %self.path.display(), entries = legacy.len(), "Saved price cache");
        Ok(())
    }
}

#[async_trait]
impl PriceCache for JsonFilePriceCache {
    async fn get(&self, key: &PriceKey) -> Option<f64> {
        self.entries.read().await.get(key).copied()
    }

    async fn put(&self, key: PriceKey, price: f64) {
        self.entries.write().await.insert(key, price);
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
