//! Annualized yield arithmetic

use crate::frequency::Frequency;

/// `amount * multiplier / price * 100`
///
/// Missing amount, missing multiplier (`Frequency::Unknown`) or a missing,
/// non-positive or non-finite price all give `None` instead of a fabricated
/// figure.
pub fn annualized_yield_pct(amount: Option<f64>, frequency: Frequency, price: Option<f64>) -> Option<f64> {
    let amount = amount.filter(|a| a.is_finite())?;
    let multiplier = frequency.multiplier()?;
    let price = price.filter(|p| p.is_finite() && *p > 0.0)?;

    let pct = amount * f64::from(multiplier) / price * 100.0;
    pct.is_finite().then_some(pct)
}

/// Round to a fixed number of decimal places for reporting
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annualized_yield() {
        let pct = annualized_yield_pct(Some(0.1), Frequency::Monthly, Some(10.0)).unwrap();
        assert!((pct - 12.0).abs() < 1e-9);

        let pct = annualized_yield_pct(Some(1.0), Frequency::Quarterly, Some(80.0)).unwrap();
        assert!((pct - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_inputs_give_none() {
        assert_eq!(annualized_yield_pct(None, Frequency::Monthly, Some(10.0)), None);
        assert_eq!(annualized_yield_pct(Some(0.1), Frequency::Unknown, Some(10.0)), None);
        assert_eq!(annualized_yield_pct(Some(0.1), Frequency::Monthly, None), None);
        assert_eq!(annualized_yield_pct(Some(0.1), Frequency::Monthly, Some(0.0)), None);
        assert_eq!(annualized_yield_pct(Some(0.1), Frequency::Monthly, Some(f64::NAN)), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.345_67, 3), 12.346);
        assert_eq!(round_to(41.0, 3), 41.0);
    }
}
