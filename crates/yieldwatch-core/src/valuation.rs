//! Valuation labelling against a ticker's own yield history
//!
//! A current yield above the band means the price is low relative to what the
//! security usually pays (Underpriced); below the band means the opposite.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::AnalysisConfig;
use crate::stats::YieldStatistics;

/// Outcome of comparing a current yield with the historical band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Valuation {
    Underpriced,
    Overpriced,
    #[serde(rename = "Fair Price")]
    FairPrice,
    Unknown,
}

impl Valuation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Underpriced => "Underpriced",
            Self::Overpriced => "Overpriced",
            Self::FairPrice => "Fair Price",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Statistic the band is centred on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandCenter {
    /// Resists skew from distress-driven yield spikes
    #[default]
    Median,
    Mean,
}

/// Closed interval `[low, high]` of yields considered fair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationBand {
    pub low: f64,
    pub high: f64,
}

impl ValuationBand {
    pub fn new(center: f64, std_dev: f64, width: f64) -> Self {
        Self {
            low: center - width * std_dev,
            high: center + width * std_dev,
        }
    }

    /// Strictly above `high` is underpriced, strictly below `low` overpriced
    pub fn classify(&self, current_yield_pct: f64) -> Valuation {
        if current_yield_pct > self.high {
            Valuation::Underpriced
        } else if current_yield_pct < self.low {
            Valuation::Overpriced
        } else {
            Valuation::FairPrice
        }
    }
}

/// Pure three-input classification with a one standard deviation band
pub fn classify(current_yield_pct: Option<f64>, center_pct: Option<f64>, std_dev_pct: Option<f64>) -> Valuation {
    classify_with_width(current_yield_pct, center_pct, std_dev_pct, 1.0)
}

fn classify_with_width(
    current_yield_pct: Option<f64>,
    center_pct: Option<f64>,
    std_dev_pct: Option<f64>,
    width: f64,
) -> Valuation {
    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
    match (finite(current_yield_pct), finite(center_pct), finite(std_dev_pct)) {
        (Some(current), Some(center), Some(std_dev)) => ValuationBand::new(center, std_dev, width).classify(current),
        _ => Valuation::Unknown,
    }
}

/// Labels current yields against per-ticker statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationLabeler {
    center: BandCenter,
    width: f64,
}

impl Default for ValuationLabeler {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl ValuationLabeler {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            center: config.band_center,
            width: config.band_width,
        }
    }

    pub fn center(&self) -> BandCenter {
        self.center
    }

    /// Band for a ticker, `None` when its statistics are incomplete
    pub fn band(&self, stats: &YieldStatistics) -> Option<ValuationBand> {
        let center = stats.center(self.center).filter(|v| v.is_finite())?;
        let std_dev = stats.std_dev_pct.filter(|v| v.is_finite())?;
        Some(ValuationBand::new(center, std_dev, self.width))
    }

    /// Label one observation; absent statistics give `Unknown`
    pub fn label(&self, current_yield_pct: Option<f64>, stats: Option<&YieldStatistics>) -> Valuation {
        let Some(stats) = stats else {
            return Valuation::Unknown;
        };
        classify_with_width(current_yield_pct, stats.center(self.center), stats.std_dev_pct, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(median: f64, mean: f64, std_dev: f64) -> YieldStatistics {
        YieldStatistics {
            ticker: "XYLD".to_string(),
            median_yield_pct: Some(median),
            mean_yield_pct: Some(mean),
            std_dev_pct: Some(std_dev),
        }
    }

    #[test]
    fn test_classify_band_edges() {
        assert_eq!(classify(Some(6.0), Some(5.0), Some(1.0)), Valuation::FairPrice);
        assert_eq!(classify(Some(6.01), Some(5.0), Some(1.0)), Valuation::Underpriced);
        assert_eq!(classify(Some(3.99), Some(5.0), Some(1.0)), Valuation::Overpriced);
        assert_eq!(classify(Some(4.0), Some(5.0), Some(1.0)), Valuation::FairPrice);
    }

    #[test]
    fn test_classify_missing_inputs() {
        assert_eq!(classify(None, Some(5.0), Some(1.0)), Valuation::Unknown);
        assert_eq!(classify(Some(5.0), None, Some(1.0)), Valuation::Unknown);
        assert_eq!(classify(Some(5.0), Some(5.0), None), Valuation::Unknown);
        assert_eq!(classify(Some(f64::NAN), Some(5.0), Some(1.0)), Valuation::Unknown);
    }

    #[test]
    fn test_labeler_uses_median_not_mean() {
        let labeler = ValuationLabeler::default();
        // Mean dragged up by an outlier; the median band still says fair.
        let s = stats(5.0, 9.0, 1.0);
        assert_eq!(labeler.label(Some(5.5), Some(&s)), Valuation::FairPrice);

        let mean_labeler = ValuationLabeler::new(&AnalysisConfig {
            band_center: BandCenter::Mean,
            ..AnalysisConfig::default()
        });
        assert_eq!(mean_labeler.label(Some(5.5), Some(&s)), Valuation::Overpriced);
    }

    #[test]
    fn test_labeler_without_history() {
        let labeler = ValuationLabeler::default();
        assert_eq!(labeler.label(Some(12.0), None), Valuation::Unknown);
        assert_eq!(labeler.label(Some(12.0), Some(&YieldStatistics::empty("NEW"))), Valuation::Unknown);
    }

    #[test]
    fn test_band_width() {
        let labeler = ValuationLabeler::new(&AnalysisConfig {
            band_width: 2.0,
            ..AnalysisConfig::default()
        });
        let band = labeler.band(&stats(5.0, 5.0, 1.0)).unwrap();
        assert_eq!(band, ValuationBand { low: 3.0, high: 7.0 });
        assert_eq!(labeler.label(Some(6.5), Some(&stats(5.0, 5.0, 1.0))), Valuation::FairPrice);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Valuation::FairPrice.to_string(), "Fair Price");
        assert_eq!(Valuation::Underpriced.to_string(), "Underpriced");
    }
}
