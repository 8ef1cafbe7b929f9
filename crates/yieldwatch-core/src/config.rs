//! Configuration for frequency inference and valuation

use crate::error::{CoreError, Result};
use crate::frequency::Frequency;
use crate::valuation::BandCenter;
use serde::{Deserialize, Serialize};

/// What to do when a cadence cannot be determined
///
/// `AssumeMonthly` resolves an undefined day gap (single-event series) and
/// unrecognised source labels to `Monthly`; `Unknown` keeps them `Unknown`,
/// which then carries no annualization multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFrequencyPolicy {
    #[default]
    AssumeMonthly,
    Unknown,
}

impl UnknownFrequencyPolicy {
    /// Label used when no cadence can be derived
    pub const fn fallback(self) -> Frequency {
        match self {
            Self::AssumeMonthly => Frequency::Monthly,
            Self::Unknown => Frequency::Unknown,
        }
    }

    /// Parse `assume_monthly` / `monthly` / `unknown`
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().replace('-', "_").as_str() {
            "assume_monthly" | "monthly" => Some(Self::AssumeMonthly),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Configuration shared by the frequency engine and the valuation labeler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// How much closer (as a relative amount difference) the previous
    /// payment must be before its spacing replaces the next payment's
    pub prefer_prev_margin: f64,

    /// Fallback for undefined gaps and unrecognised labels
    pub unknown_policy: UnknownFrequencyPolicy,

    /// Centre of the valuation band
    pub band_center: BandCenter,

    /// Half-width of the valuation band in standard deviations
    pub band_width: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            prefer_prev_margin: 0.05,
            unknown_policy: UnknownFrequencyPolicy::AssumeMonthly,
            band_center: BandCenter::Median,
            band_width: 1.0,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.prefer_prev_margin.is_finite() || self.prefer_prev_margin < 0.0 {
            return Err(CoreError::InvalidConfig(
                "prefer_prev_margin must be a finite, non-negative number".to_string(),
            ));
        }

        if !self.band_width.is_finite() || self.band_width <= 0.0 {
            return Err(CoreError::InvalidConfig(
                "band_width must be a finite, positive number".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AnalysisConfig
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    prefer_prev_margin: Option<f64>,
    unknown_policy: Option<UnknownFrequencyPolicy>,
    band_center: Option<BandCenter>,
    band_width: Option<f64>,
}

impl AnalysisConfigBuilder {
    pub fn prefer_prev_margin(mut self, margin: f64) -> Self {
        self.prefer_prev_margin = Some(margin);
        self
    }

    pub fn unknown_policy(mut self, policy: UnknownFrequencyPolicy) -> Self {
        self.unknown_policy = Some(policy);
        self
    }

    pub fn band_center(mut self, center: BandCenter) -> Self {
        self.band_center = Some(center);
        self
    }

    pub fn band_width(mut self, width: f64) -> Self {
        self.band_width = Some(width);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalysisConfig> {
        let defaults = AnalysisConfig::default();

        let config = AnalysisConfig {
            prefer_prev_margin: self.prefer_prev_margin.unwrap_or(defaults.prefer_prev_margin),
            unknown_policy: self.unknown_policy.unwrap_or(defaults.unknown_policy),
            band_center: self.band_center.unwrap_or(defaults.band_center),
            band_width: self.band_width.unwrap_or(defaults.band_width),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.prefer_prev_margin, 0.05);
        assert_eq!(config.unknown_policy, UnknownFrequencyPolicy::AssumeMonthly);
        assert_eq!(config.band_center, BandCenter::Median);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AnalysisConfig::builder()
            .unknown_policy(UnknownFrequencyPolicy::Unknown)
            .band_center(BandCenter::Mean)
            .band_width(1.5)
            .build()
            .unwrap();

        assert_eq!(config.unknown_policy, UnknownFrequencyPolicy::Unknown);
        assert_eq!(config.band_center, BandCenter::Mean);
        assert_eq!(config.band_width, 1.5);
        assert_eq!(config.prefer_prev_margin, 0.05);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(AnalysisConfig::builder().band_width(0.0).build().is_err());
        assert!(AnalysisConfig::builder().band_width(f64::NAN).build().is_err());
        assert!(AnalysisConfig::builder().prefer_prev_margin(-0.01).build().is_err());
    }

    #[test]
    fn test_policy_parse_and_serde() {
        assert_eq!(UnknownFrequencyPolicy::parse("unknown"), Some(UnknownFrequencyPolicy::Unknown));
        assert_eq!(
            UnknownFrequencyPolicy::parse("Assume-Monthly"),
            Some(UnknownFrequencyPolicy::AssumeMonthly)
        );
        assert_eq!(UnknownFrequencyPolicy::parse("guess"), None);

        let config: AnalysisConfig = serde_json::from_str(r#"{"unknown_policy": "unknown"}"#).unwrap();
        assert_eq!(config.unknown_policy, UnknownFrequencyPolicy::Unknown);
        assert_eq!(config.band_width, 1.0);
    }
}
