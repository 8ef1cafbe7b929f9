//! Data model shared by the engine, the labeler and the data collaborators

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amount::parse_amount;

/// One distribution payment for a security
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    /// Ticker symbol as it appears in the persisted table
    pub ticker: String,
    /// Ex-dividend date
    pub ex_date: NaiveDate,
    /// Distribution amount per share, `None` when missing or unparseable
    pub amount: Option<f64>,
}

impl DividendEvent {
    /// Create a new event; non-finite amounts are stored as missing
    pub fn new(ticker: impl Into<String>, ex_date: NaiveDate, amount: Option<f64>) -> Self {
        Self {
            ticker: ticker.into(),
            ex_date,
            amount: amount.filter(|a| a.is_finite()),
        }
    }

    /// Create an event from a raw amount string such as `"$0.1,250"` or `"—"`
    pub fn from_raw(ticker: impl Into<String>, ex_date: NaiveDate, raw_amount: &str) -> Self {
        Self::new(ticker, ex_date, parse_amount(raw_amount))
    }

    /// Uniqueness key within a persisted table
    pub fn key(&self) -> (&str, NaiveDate) {
        (self.ticker.as_str(), self.ex_date)
    }
}

/// Why a collaborator could not provide a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingReason {
    /// The source has no data for the request
    NotFound,
    /// The source failed (network, rate limit, bad response)
    Unavailable(String),
    /// The source answered but the value could not be parsed
    Unparseable(String),
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Unavailable(reason) => write!(f, "unavailable: {reason}"),
            Self::Unparseable(raw) => write!(f, "unparseable value: {raw}"),
        }
    }
}

/// Outcome of a collaborator lookup: a value, or the reason it is missing
///
/// Downstream computation branches on this instead of catching errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Lookup<T> {
    Found(T),
    Missing(MissingReason),
}

impl<T> Lookup<T> {
    /// Shorthand for `Lookup::Missing(MissingReason::Unavailable(..))`
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Missing(MissingReason::Unavailable(reason.into()))
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Drop the missing reason
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::Missing(reason) => Lookup::Missing(reason),
        }
    }

    /// Chain a lookup that may itself come up empty
    pub fn and_then<U, F: FnOnce(T) -> Lookup<U>>(self, f: F) -> Lookup<U> {
        match self {
            Self::Found(value) => f(value),
            Self::Missing(reason) => Lookup::Missing(reason),
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing(MissingReason::NotFound), Self::Found)
    }
}
