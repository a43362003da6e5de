//! Summary statistics over a decision stream.

use serde::{Deserialize, Serialize};

use crate::domain::decision_event::DecisionEvent;
use crate::domain::error::ChartError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalStats {
    pub total: usize,
    pub enter: usize,
    pub skip: usize,
    pub enter_ratio: f64,
    pub mean_confidence: f64,
}

impl EvalStats {
    /// Ratios are rounded to 3 places; events without a confidence do not
    /// count toward the mean. Categories are counted by exact name.
    pub fn compute(events: &[DecisionEvent]) -> Result<Self, ChartError> {
        if events.is_empty() {
            return Err(ChartError::NoData {
                what: "decision events".into(),
            });
        }

        let total = events.len();
        let enter = count_category(events, "ENTER");
        let skip = count_category(events, "SKIP");

        let confidences: Vec<f64> = events.iter().filter_map(|e| e.confidence).collect();
        let mean_confidence = if confidences.is_empty() {
            0.0
        } else {
            confidences.iter().sum::<f64>() / confidences.len() as f64
        };

        Ok(Self {
            total,
            enter,
            skip,
            enter_ratio: round3(enter as f64 / total as f64),
            mean_confidence: round3(mean_confidence),
        })
    }
}

fn count_category(events: &[DecisionEvent], category: &str) -> usize {
    events
        .iter()
        .filter(|e| e.category == category)
        .count()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn counts_and_ratios() {
        let events = vec![
            DecisionEvent::new(1.0, "ENTER").with_confidence(0.9),
            DecisionEvent::new(2.0, "SKIP").with_confidence(0.4),
            DecisionEvent::new(3.0, "SKIP").with_confidence(0.5),
        ];
        let stats = EvalStats::compute(&events).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.enter, 1);
        assert_eq!(stats.skip, 2);
        assert_relative_eq!(stats.enter_ratio, 0.333);
        assert_relative_eq!(stats.mean_confidence, 0.6);
    }

    #[test]
    fn mean_ignores_missing_confidence() {
        let events = vec![
            DecisionEvent::new(1.0, "ENTER").with_confidence(0.8),
            DecisionEvent::new(2.0, "REVERSE"),
        ];
        let stats = EvalStats::compute(&events).unwrap();
        assert_relative_eq!(stats.mean_confidence, 0.8);
        assert_relative_eq!(stats.enter_ratio, 0.5);
    }

    #[test]
    fn no_confidence_at_all_is_zero() {
        let events = vec![DecisionEvent::new(1.0, "SKIP")];
        let stats = EvalStats::compute(&events).unwrap();
        assert_eq!(stats.mean_confidence, 0.0);
        assert_eq!(stats.enter_ratio, 0.0);
    }

    #[test]
    fn counts_are_exact_category_matches() {
        let events = vec![
            DecisionEvent::new(1.0, "ENTER"),
            DecisionEvent::new(2.0, "enter"),
            DecisionEvent::new(3.0, " SKIP"),
        ];
        let stats = EvalStats::compute(&events).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.enter, 1);
        assert_eq!(stats.skip, 0);
    }

    #[test]
    fn empty_is_an_error() {
        let err = EvalStats::compute(&[]).unwrap_err();
        assert!(matches!(err, ChartError::NoData { .. }));
    }
}
