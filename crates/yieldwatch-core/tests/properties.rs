//! Behavioural checks for frequency inference and valuation labelling

use chrono::{Duration, NaiveDate};
use yieldwatch_core::stats::summarize;
use yieldwatch_core::valuation::classify;
use yieldwatch_core::{
    AnalysisConfig, DividendEvent, Frequency, FrequencyEngine, UnknownFrequencyPolicy, Valuation, ValuationLabeler,
    YieldStatistics,
};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

/// Builds a ticker history from `(days after previous, amount)` steps
fn history(ticker: &str, steps: &[(i64, f64)]) -> Vec<DividendEvent> {
    let mut date = start();
    steps
        .iter()
        .map(|(gap, amount)| {
            date += Duration::days(*gap);
            DividendEvent::new(ticker, date, Some(*amount))
        })
        .collect()
}

#[test]
fn gap_boundaries_through_the_engine() {
    let engine = FrequencyEngine::default();
    let cases = [
        (10, Frequency::BiWeekly),
        (20, Frequency::SemiMonthly),
        (60, Frequency::Quarterly),
        (130, Frequency::SemiAnnual),
        (250, Frequency::Annual),
    ];

    for (gap, expected) in cases {
        let events = history("GAP", &[(0, 0.25), (gap, 0.25)]);
        let labels = engine.infer_sequence(&events);
        assert_eq!(labels, vec![expected; 2], "gap of {gap} days");
    }
}

#[test]
fn clearly_closer_previous_amount_wins() {
    // prev gap 95 days with rel_diff 0.01, next gap 30 days with rel_diff 0.50
    let events = history("NBR", &[(0, 0.99), (95, 1.00), (30, 0.50)]);
    let labels = FrequencyEngine::default().infer_sequence(&events);
    assert_eq!(labels[1], Frequency::Quarterly);
}

#[test]
fn near_tie_keeps_next_neighbor() {
    // rel_diff_prev = 0.10, rel_diff_next = 0.12
    let events = history("TIE", &[(0, 0.90), (95, 1.00), (30, 0.88)]);
    let labels = FrequencyEngine::default().infer_sequence(&events);
    assert_eq!(labels[1], Frequency::Monthly);
}

#[test]
fn inference_is_deterministic_and_idempotent() {
    let mut events = history("AAA", &[(0, 0.1), (28, 0.1), (35, 0.11), (91, 0.3), (7, 0.3)]);
    events.extend(history("BBB", &[(3, 0.5), (91, 0.5), (92, 0.52)]));

    let engine = FrequencyEngine::default();
    let first = engine.infer_table(events.clone());
    let second = engine.infer_table(events.iter().rev().cloned());
    assert_eq!(first, second);

    let replay = engine.infer_table(first.iter().map(|c| c.event.clone()));
    assert_eq!(first, replay);
}

#[test]
fn fallback_policy_assume_monthly() {
    let engine = FrequencyEngine::new(&AnalysisConfig::default());
    let single = history("ONE", &[(0, 0.2)]);
    assert_eq!(engine.infer_sequence(&single), vec![Frequency::Monthly]);
    assert_eq!(Frequency::normalize(Some("irregular"), engine.policy()), Frequency::Monthly);
}

#[test]
fn fallback_policy_unknown() {
    let config = AnalysisConfig::builder()
        .unknown_policy(UnknownFrequencyPolicy::Unknown)
        .build()
        .unwrap();
    let engine = FrequencyEngine::new(&config);
    let single = history("ONE", &[(0, 0.2)]);

    let labels = engine.infer_sequence(&single);
    assert_eq!(labels, vec![Frequency::Unknown]);
    assert_eq!(labels[0].multiplier(), None);
}

#[test]
fn valuation_boundaries() {
    assert_eq!(classify(Some(6.0), Some(5.0), Some(1.0)), Valuation::FairPrice);
    assert_eq!(classify(Some(6.01), Some(5.0), Some(1.0)), Valuation::Underpriced);
    assert_eq!(classify(Some(3.99), Some(5.0), Some(1.0)), Valuation::Overpriced);
    assert_eq!(classify(Some(4.0), Some(5.0), Some(1.0)), Valuation::FairPrice);
}

#[test]
fn ticker_without_history_is_always_unknown() {
    let labeler = ValuationLabeler::default();
    let known: Vec<YieldStatistics> = vec![summarize("KNOWN", [Some(4.0), Some(6.0)])];
    let lookup = |ticker: &str| known.iter().find(|s| s.ticker == ticker);

    for current in [None, Some(0.0), Some(5.0), Some(50.0)] {
        assert_eq!(labeler.label(current, lookup("ABSENT")), Valuation::Unknown);
    }
    assert_ne!(labeler.label(Some(5.0), lookup("KNOWN")), Valuation::Unknown);
}
