//! Frequency inference from irregular ex-dividend histories
//!
//! Each event is labelled from the spacing to one of its neighbors. The next
//! payment is preferred; the previous one wins only when its amount is clearly
//! more similar, so a change in payout regime does not flip the cadence of the
//! events around it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::{AnalysisConfig, UnknownFrequencyPolicy};
use crate::frequency::Frequency;
use crate::model::DividendEvent;

/// Relative difference `|a-b| / max(|a|,|b|)` in `[0, 1]` for same-sign amounts
///
/// `0` when both are zero, `None` when either is missing.
pub fn rel_diff(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    let (a, b) = (a?, b?);
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        return Some(0.0);
    }
    Some((a - b).abs() / scale)
}

/// Which neighbor's spacing labels an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Neighbor {
    Prev,
    Next,
}

/// Spacing and amount similarity of one event to its neighbors
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NeighborGaps {
    pub days_to_prev: Option<i64>,
    pub days_to_next: Option<i64>,
    pub rel_diff_prev: Option<f64>,
    pub rel_diff_next: Option<f64>,
}

impl NeighborGaps {
    /// Gaps for the event at `index` of a chronologically sorted slice
    pub fn at(events: &[DividendEvent], index: usize) -> Self {
        let current = &events[index];
        let prev = index.checked_sub(1).and_then(|i| events.get(i));
        let next = events.get(index + 1);

        Self {
            days_to_prev: prev.map(|p| (current.ex_date - p.ex_date).num_days()),
            days_to_next: next.map(|n| (n.ex_date - current.ex_date).num_days()),
            rel_diff_prev: prev.and_then(|p| rel_diff(current.amount, p.amount)),
            rel_diff_next: next.and_then(|n| rel_diff(current.amount, n.amount)),
        }
    }
}

/// An event together with its inferred cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    pub event: DividendEvent,
    pub frequency: Frequency,
}

/// Assigns a cadence to every event of a ticker from its own history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyEngine {
    prefer_prev_margin: f64,
    policy: UnknownFrequencyPolicy,
}

impl Default for FrequencyEngine {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl FrequencyEngine {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            prefer_prev_margin: config.prefer_prev_margin,
            policy: config.unknown_policy,
        }
    }

    pub fn policy(&self) -> UnknownFrequencyPolicy {
        self.policy
    }

    /// PREV only when `rel_diff_prev + margin < rel_diff_next`; any missing
    /// similarity keeps NEXT
    pub fn choose_neighbor(&self, rel_diff_prev: Option<f64>, rel_diff_next: Option<f64>) -> Neighbor {
        match (rel_diff_prev, rel_diff_next) {
            (Some(prev), Some(next)) if prev + self.prefer_prev_margin < next => Neighbor::Prev,
            _ => Neighbor::Next,
        }
    }

    /// Day gap used for labelling, falling back to the other side at the edges
    pub fn chosen_gap(&self, gaps: &NeighborGaps) -> Option<i64> {
        match self.choose_neighbor(gaps.rel_diff_prev, gaps.rel_diff_next) {
            Neighbor::Prev => gaps.days_to_prev.or(gaps.days_to_next),
            Neighbor::Next => gaps.days_to_next.or(gaps.days_to_prev),
        }
    }

    /// Label one event from its neighbor gaps
    pub fn classify(&self, gaps: &NeighborGaps) -> Frequency {
        Frequency::from_gap_days(self.chosen_gap(gaps), self.policy)
    }

    /// Label every event of one ticker's history
    ///
    /// `events` must be sorted ascending by ex-date. An empty slice yields no
    /// labels; a single event resolves through the fallback policy.
    pub fn infer_sequence(&self, events: &[DividendEvent]) -> Vec<Frequency> {
        (0..events.len())
            .map(|i| self.classify(&NeighborGaps::at(events, i)))
            .collect()
    }

    /// Label a mixed table of events
    ///
    /// Events are grouped per ticker, sorted by ex-date and deduplicated on
    /// `(ticker, ex_date)` keeping the last occurrence. Output is ordered by
    /// ticker then ex-date.
    pub fn infer_table(&self, events: impl IntoIterator<Item = DividendEvent>) -> Vec<ClassifiedEvent> {
        let grouped = group_by_ticker(events);
        let mut out = Vec::new();

        for (ticker, sequence) in grouped {
            let labels = self.infer_sequence(&sequence);
            debug!(ticker = %ticker, events = sequence.len(), "Inferred frequencies");
            out.extend(
                sequence
                    .into_iter()
                    .zip(labels)
                    .map(|(event, frequency)| ClassifiedEvent { event, frequency }),
            );
        }

        out
    }
}

/// Group events per ticker, sorted by ex-date, last occurrence of a date wins
pub fn group_by_ticker(events: impl IntoIterator<Item = DividendEvent>) -> BTreeMap<String, Vec<DividendEvent>> {
    let mut keyed: BTreeMap<String, BTreeMap<NaiveDate, DividendEvent>> = BTreeMap::new();
    for event in events {
        keyed
            .entry(event.ticker.clone())
            .or_default()
            .insert(event.ex_date, event);
    }

    keyed
        .into_iter()
        .map(|(ticker, by_date)| (ticker, by_date.into_values().collect()))
        .collect()
}
