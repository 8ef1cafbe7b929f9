//! Error types for yieldwatch-core

use thiserror::Error;

/// Result type alias for yieldwatch-core
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the core crate
///
/// The inference and valuation algorithms themselves never fail; these cover
/// configuration and explicit parsing entry points only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Analysis configuration rejected by validation
    #[error("Invalid analysis configuration: {0}")]
    InvalidConfig(String),

    /// Frequency text did not match any known cadence
    #[error("Unrecognized frequency label: {0}")]
    UnrecognizedFrequency(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::UnrecognizedFrequency("fortnightly-ish".to_string());
        assert_eq!(err.to_string(), "Unrecognized frequency label: fortnightly-ish");

        let err = CoreError::InvalidConfig("band_width must be positive".to_string());
        assert!(err.to_string().contains("band_width"));
    }
}
