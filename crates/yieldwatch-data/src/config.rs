//! Configuration for the yield trackers

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use yieldwatch_core::{AnalysisConfig, UnknownFrequencyPolicy};

/// Environment variable overriding the price cache file
pub const PRICE_CACHE_ENV: &str = "YIELDWATCH_PRICE_CACHE";
/// Environment variable overriding the retry count
pub const MAX_RETRIES_ENV: &str = "YIELDWATCH_MAX_RETRIES";
/// Environment variable overriding the unknown-frequency policy
pub const UNKNOWN_POLICY_ENV: &str = "YIELDWATCH_UNKNOWN_POLICY";

/// Upper bound on attempts per API call
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// A group of tickers sharing an exchange and a set of output files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Short name used on the command line
    pub name: String,
    /// Text file with one ticker per line
    pub ticker_file: PathBuf,
    /// Whether symbols trade on the TSX (Yahoo `.TO` suffix)
    pub is_tsx: bool,
    /// Persisted dividend history table
    pub history_csv: PathBuf,
    /// Per-ticker yield statistics
    pub stats_csv: PathBuf,
    /// Current-yield report
    pub report_csv: PathBuf,
}

impl Region {
    /// Canadian listings
    pub fn canada() -> Self {
        Self {
            name: "canada".to_string(),
            ticker_file: PathBuf::from("tickers_canada.txt"),
            is_tsx: true,
            history_csv: PathBuf::from("historical_yield_canada.csv"),
            stats_csv: PathBuf::from("yield_stats_canada.csv"),
            report_csv: PathBuf::from("current_etf_yields_canada.csv"),
        }
    }

    /// US listings
    pub fn us() -> Self {
        Self {
            name: "us".to_string(),
            ticker_file: PathBuf::from("tickers_us.txt"),
            is_tsx: false,
            history_csv: PathBuf::from("historical_yield_us.csv"),
            stats_csv: PathBuf::from("yield_stats_us.csv"),
            report_csv: PathBuf::from("current_etf_yields_us.csv"),
        }
    }
}

/// Configuration for data collection and reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Regions processed by the trackers, in order
    pub regions: Vec<Region>,

    /// JSON side file for `(symbol, date)` price lookups
    pub price_cache_path: PathBuf,

    /// Maximum number of attempts for a single API call
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_backoff_base: Duration,

    /// Timeout for a single API call
    pub request_timeout: Duration,

    /// Request rate ceiling for the quote provider
    pub requests_per_second: u32,

    /// How far back dividend histories are requested
    pub history_lookback_years: u32,

    /// Frequency inference and valuation settings
    pub analysis: AnalysisConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            regions: vec![Region::canada(), Region::us()],
            price_cache_path: PathBuf::from("price_cache.json"),
            max_retries: 3,
            retry_backoff_base: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
            requests_per_second: 2,
            history_lookback_years: 20,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Create a new configuration builder
    pub fn builder() -> TrackerConfigBuilder {
        TrackerConfigBuilder::default()
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = yieldwatch_utils::load_json(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `YIELDWATCH_*` environment overrides
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(PRICE_CACHE_ENV) {
            self.price_cache_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(MAX_RETRIES_ENV) {
            self.max_retries = raw
                .trim()
                .parse()
                .map_err(|_| DataError::Config(format!("{MAX_RETRIES_ENV} must be an integer, got {raw:?}")))?;
        }

        if let Some(raw) = lookup(UNKNOWN_POLICY_ENV) {
            self.analysis.unknown_policy = UnknownFrequencyPolicy::parse(&raw)
                .ok_or_else(|| DataError::Config(format!("{UNKNOWN_POLICY_ENV} must be assume_monthly or unknown")))?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(DataError::Config("max_retries must be greater than 0".to_string()));
        }

        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(DataError::Config(format!("max_retries must be at most {MAX_RETRIES_LIMIT}")));
        }

        if self.requests_per_second == 0 {
            return Err(DataError::Config("requests_per_second must be greater than 0".to_string()));
        }

        if self.history_lookback_years == 0 {
            return Err(DataError::Config("history_lookback_years must be greater than 0".to_string()));
        }

        let mut names: Vec<&str> = self.regions.iter().map(|r| r.name.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(DataError::Config("region names must be unique".to_string()));
        }

        self.analysis.validate()?;
        Ok(())
    }

    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`, saturating
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff_base.saturating_mul(2_u32.saturating_pow(attempt))
    }

    /// Find a region by name (case-insensitive)
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name.eq_ignore_ascii_case(name))
    }
}

/// Builder for TrackerConfig
#[derive(Debug, Default)]
pub struct TrackerConfigBuilder {
    regions: Option<Vec<Region>>,
    price_cache_path: Option<PathBuf>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    request_timeout: Option<Duration>,
    requests_per_second: Option<u32>,
    history_lookback_years: Option<u32>,
    analysis: Option<AnalysisConfig>,
}

impl TrackerConfigBuilder {
    /// Replace the region list
    pub fn regions(mut self, regions: Vec<Region>) -> Self {
        self.regions = Some(regions);
        self
    }

    /// Set the price cache side file
    pub fn price_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.price_cache_path = Some(path.into());
        self
    }

    /// Set maximum retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    pub fn requests_per_second(mut self, rate: u32) -> Self {
        self.requests_per_second = Some(rate);
        self
    }

    pub fn history_lookback_years(mut self, years: u32) -> Self {
        self.history_lookback_years = Some(years);
        self
    }

    /// Set frequency inference and valuation settings
    pub fn analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = Some(analysis);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<TrackerConfig> {
        let defaults = TrackerConfig::default();

        let config = TrackerConfig {
            regions: self.regions.unwrap_or(defaults.regions),
            price_cache_path: self.price_cache_path.unwrap_or(defaults.price_cache_path),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            requests_per_second: self.requests_per_second.unwrap_or(defaults.requests_per_second),
            history_lookback_years: self.history_lookback_years.unwrap_or(defaults.history_lookback_years),
            analysis: self.analysis.unwrap_or(defaults.analysis),
        };

        config.validate()?;
        Ok(config)
    }
}
