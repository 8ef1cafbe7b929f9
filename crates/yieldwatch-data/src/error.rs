//! Error types for data collection and table I/O

use std::path::PathBuf;
use thiserror::Error;
use yieldwatch_core::CoreError;

/// Data layer errors
#[derive(Debug, Error)]
pub enum DataError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A table is missing a column it cannot be processed without
    #[error("{path} is missing required column: {column}")]
    MissingColumn {
        path: PathBuf,
        column: String,
    },

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinance(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the domain layer
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for data operations
pub type Result<T> = std::result::Result<T, DataError>;

/// Convert anyhow::Error to DataError
impl From<anyhow::Error> for DataError {
    fn from(err: anyhow::Error) -> Self {
        DataError::Other(err.to_string())
    }
}

impl From<yieldwatch_utils::ConfigFileError> for DataError {
    fn from(err: yieldwatch_utils::ConfigFileError) -> Self {
        DataError::Config(err.to_string())
    }
}

impl From<yahoo_finance_api::YahooError> for DataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        DataError::YahooFinance(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::MissingColumn {
            path: PathBuf::from("historical_yield_us.csv"),
            column: "Dividend".to_string(),
        };
        assert_eq!(err.to_string(), "historical_yield_us.csv is missing required column: Dividend");

        let err = DataError::YahooFinance("no quotes".to_string());
        assert_eq!(err.to_string(), "Yahoo Finance error: no quotes");
    }

    #[test]
    fn test_error_conversion() {
        let core = CoreError::InvalidConfig("band_width must be positive".to_string());
        let err: DataError = core.into();
        assert!(err.to_string().contains("band_width"));

        let err: DataError = anyhow::anyhow!("boom").into();
        match err {
            DataError::Other(msg) => assert_eq!(msg, "boom"),
            _ => panic!("Expected Other variant"),
        }
    }
}
