//! Distribution cadence labels and their annualization multipliers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::UnknownFrequencyPolicy;
use crate::error::CoreError;

/// How often a security pays a distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Weekly,
    #[serde(rename = "Bi-Weekly")]
    BiWeekly,
    #[serde(rename = "Semi-Monthly")]
    SemiMonthly,
    Monthly,
    Quarterly,
    #[serde(rename = "Semi-Annual")]
    SemiAnnual,
    Annual,
    Unknown,
}

/// Lower bounds (inclusive, in days) of each gap bucket, checked from the top
const GAP_BUCKETS: &[(i64, Frequency)] = &[
    (250, Frequency::Annual),
    (130, Frequency::SemiAnnual),
    (60, Frequency::Quarterly),
    (25, Frequency::Monthly),
    (20, Frequency::SemiMonthly),
    (10, Frequency::BiWeekly),
    (0, Frequency::Weekly),
];

impl Frequency {
    /// All labels that carry a multiplier, most frequent first
    pub const KNOWN: [Frequency; 7] = [
        Self::Weekly,
        Self::BiWeekly,
        Self::SemiMonthly,
        Self::Monthly,
        Self::Quarterly,
        Self::SemiAnnual,
        Self::Annual,
    ];

    /// Payments per year, `None` for `Unknown`
    pub const fn multiplier(self) -> Option<u32> {
        match self {
            Self::Weekly => Some(52),
            Self::BiWeekly => Some(26),
            Self::SemiMonthly => Some(24),
            Self::Monthly => Some(12),
            Self::Quarterly => Some(4),
            Self::SemiAnnual => Some(2),
            Self::Annual => Some(1),
            Self::Unknown => None,
        }
    }

    /// Display label used in CSV output
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::BiWeekly => "Bi-Weekly",
            Self::SemiMonthly => "Semi-Monthly",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::SemiAnnual => "Semi-Annual",
            Self::Annual => "Annual",
            Self::Unknown => "Unknown",
        }
    }

    /// Map a day gap between consecutive ex-dates to a cadence
    ///
    /// Buckets are inclusive-lower: `[0,10)` weekly, `[10,20)` bi-weekly,
    /// `[20,25)` semi-monthly, `[25,60)` monthly, `[60,130)` quarterly,
    /// `[130,250)` semi-annual, `250+` annual. An undefined or non-positive
    /// gap resolves through `policy`.
    pub fn from_gap_days(days: Option<i64>, policy: UnknownFrequencyPolicy) -> Self {
        match days {
            Some(days) if days > 0 => GAP_BUCKETS
                .iter()
                .find(|(lower, _)| days >= *lower)
                .map_or(Self::Weekly, |(_, freq)| *freq),
            _ => policy.fallback(),
        }
    }

    /// Normalize free-form frequency text (`"bi weekly"`, `"Semi_Annual"`, `"qtr"`)
    ///
    /// Returns `None` when the text is empty or not a recognised cadence.
    pub fn parse_label(text: &str) -> Option<Self> {
        let compact: String = text
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-' | '/' | '.'))
            .collect();

        match compact.as_str() {
            "weekly" => Some(Self::Weekly),
            "biweekly" => Some(Self::BiWeekly),
            "semimonthly" => Some(Self::SemiMonthly),
            "monthly" => Some(Self::Monthly),
            "quarterly" | "qtr" => Some(Self::Quarterly),
            "semiannual" | "semiannually" => Some(Self::SemiAnnual),
            "annual" | "annually" | "yearly" => Some(Self::Annual),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Normalize source-reported text, resolving unrecognised input through `policy`
    pub fn normalize(text: Option<&str>, policy: UnknownFrequencyPolicy) -> Self {
        text.and_then(Self::parse_label)
            .filter(|freq| *freq != Self::Unknown)
            .unwrap_or_else(|| policy.fallback())
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s).ok_or_else(|| CoreError::UnrecognizedFrequency(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONTHLY: UnknownFrequencyPolicy = UnknownFrequencyPolicy::AssumeMonthly;
    const UNKNOWN: UnknownFrequencyPolicy = UnknownFrequencyPolicy::Unknown;

    #[test]
    fn test_multipliers() {
        let expected = [52, 26, 24, 12, 4, 2, 1];
        for (freq, mult) in Frequency::KNOWN.iter().zip(expected) {
            assert_eq!(freq.multiplier(), Some(mult));
        }
        assert_eq!(Frequency::Unknown.multiplier(), None);
    }

    #[test]
    fn test_gap_buckets() {
        assert_eq!(Frequency::from_gap_days(Some(7), MONTHLY), Frequency::Weekly);
        assert_eq!(Frequency::from_gap_days(Some(14), MONTHLY), Frequency::BiWeekly);
        assert_eq!(Frequency::from_gap_days(Some(15), MONTHLY), Frequency::BiWeekly);
        assert_eq!(Frequency::from_gap_days(Some(31), MONTHLY), Frequency::Monthly);
        assert_eq!(Frequency::from_gap_days(Some(91), MONTHLY), Frequency::Quarterly);
        assert_eq!(Frequency::from_gap_days(Some(182), MONTHLY), Frequency::SemiAnnual);
        assert_eq!(Frequency::from_gap_days(Some(365), MONTHLY), Frequency::Annual);
    }

    #[test]
    fn test_gap_boundaries_are_inclusive_lower() {
        assert_eq!(Frequency::from_gap_days(Some(9), MONTHLY), Frequency::Weekly);
        assert_eq!(Frequency::from_gap_days(Some(10), MONTHLY), Frequency::BiWeekly);
        assert_eq!(Frequency::from_gap_days(Some(20), MONTHLY), Frequency::SemiMonthly);
        assert_eq!(Frequency::from_gap_days(Some(24), MONTHLY), Frequency::SemiMonthly);
        assert_eq!(Frequency::from_gap_days(Some(25), MONTHLY), Frequency::Monthly);
        assert_eq!(Frequency::from_gap_days(Some(59), MONTHLY), Frequency::Monthly);
        assert_eq!(Frequency::from_gap_days(Some(60), MONTHLY), Frequency::Quarterly);
        assert_eq!(Frequency::from_gap_days(Some(130), MONTHLY), Frequency::SemiAnnual);
        assert_eq!(Frequency::from_gap_days(Some(250), MONTHLY), Frequency::Annual);
    }

    #[test]
    fn test_undefined_gap_follows_policy() {
        assert_eq!(Frequency::from_gap_days(None, MONTHLY), Frequency::Monthly);
        assert_eq!(Frequency::from_gap_days(Some(0), MONTHLY), Frequency::Monthly);
        assert_eq!(Frequency::from_gap_days(Some(-3), MONTHLY), Frequency::Monthly);

        assert_eq!(Frequency::from_gap_days(None, UNKNOWN), Frequency::Unknown);
        assert_eq!(Frequency::from_gap_days(Some(0), UNKNOWN), Frequency::Unknown);
    }

    #[test]
    fn test_parse_label_aliases() {
        assert_eq!(Frequency::parse_label("Bi-Weekly"), Some(Frequency::BiWeekly));
        assert_eq!(Frequency::parse_label("biweekly"), Some(Frequency::BiWeekly));
        assert_eq!(Frequency::parse_label("semi monthly"), Some(Frequency::SemiMonthly));
        assert_eq!(Frequency::parse_label(" Semi_Annual "), Some(Frequency::SemiAnnual));
        assert_eq!(Frequency::parse_label("QTR"), Some(Frequency::Quarterly));
        assert_eq!(Frequency::parse_label("yearly"), Some(Frequency::Annual));
        assert_eq!(Frequency::parse_label("annually"), Some(Frequency::Annual));
        assert_eq!(Frequency::parse_label(""), None);
        assert_eq!(Frequency::parse_label("irregular"), None);
    }

    #[test]
    fn test_normalize_with_policy() {
        assert_eq!(Frequency::normalize(Some("quarterly"), UNKNOWN), Frequency::Quarterly);
        assert_eq!(Frequency::normalize(Some("irregular"), MONTHLY), Frequency::Monthly);
        assert_eq!(Frequency::normalize(Some("irregular"), UNKNOWN), Frequency::Unknown);
        assert_eq!(Frequency::normalize(None, MONTHLY), Frequency::Monthly);
        assert_eq!(Frequency::normalize(Some("Unknown"), UNKNOWN), Frequency::Unknown);
    }

    #[test]
    fn test_display_and_from_str() {
        for freq in Frequency::KNOWN {
            assert_eq!(freq.to_string().parse::<Frequency>().unwrap(), freq);
        }
        assert!("sometimes".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&Frequency::SemiMonthly).unwrap();
        assert_eq!(json, "\"Semi-Monthly\"");
        let freq: Frequency = serde_json::from_str("\"Bi-Weekly\"").unwrap();
        assert_eq!(freq, Frequency::BiWeekly);
    }
}
