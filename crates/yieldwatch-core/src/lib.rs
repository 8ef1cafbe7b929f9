//! Core domain logic for yieldwatch
//!
//! Everything in this crate is pure and synchronous. It covers:
//!
//! - The data model for dividend events and collaborator lookups
//! - Sanitising scraped amount strings into numbers
//! - The frequency inference engine (neighbor spacing + amount similarity)
//! - Annualized yield and per-ticker yield statistics
//! - The valuation labeler (median ± std-dev band)
//!
//! Missing inputs never raise: they flow through as `None`, `Frequency::Unknown`
//! or `Valuation::Unknown`.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use yieldwatch_core::{AnalysisConfig, DividendEvent, Frequency, FrequencyEngine};
//!
//! let date = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
//! let events = vec![
//!     DividendEvent::new("XYLD", date(1, 22), Some(0.33)),
//!     DividendEvent::new("XYLD", date(2, 20), Some(0.34)),
//!     DividendEvent::new("XYLD", date(3, 18), Some(0.33)),
//! ];
//!
//! let engine = FrequencyEngine::new(&AnalysisConfig::default());
//! let labels = engine.infer_sequence(&events);
//! assert!(labels.iter().all(|f| *f == Frequency::Monthly));
//! ```

pub mod amount;
pub mod config;
pub mod error;
pub mod frequency;
pub mod inference;
pub mod model;
pub mod stats;
pub mod valuation;
pub mod yields;

pub use config::{AnalysisConfig, AnalysisConfigBuilder, UnknownFrequencyPolicy};
pub use error::{CoreError, Result};
pub use frequency::Frequency;
pub use inference::{ClassifiedEvent, FrequencyEngine, Neighbor, NeighborGaps};
pub use model::{DividendEvent, Lookup, MissingReason};
pub use stats::YieldStatistics;
pub use valuation::{BandCenter, Valuation, ValuationBand, ValuationLabeler};
