//! Forward-match lookup from event timestamps to price bars.

use crate::domain::price_bar::PriceBar;
use crate::domain::timestamp::SortKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Earliest bar at or after the event.
    Forward,
    /// Event lies after every bar; last bar in input order used instead.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarMatch {
    /// Index into the original bar slice.
    pub index: usize,
    pub kind: MatchKind,
}

/// Bar positions stable-sorted by timestamp, so ties keep input order.
pub struct BarIndex {
    keys: Vec<SortKey>,
    order: Vec<usize>,
}

impl BarIndex {
    pub fn new(bars: &[PriceBar]) -> Self {
        let mut entries: Vec<(SortKey, usize)> = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.timestamp.sort_key(), i))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let (keys, order) = entries.into_iter().unzip();
        Self { keys, order }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `None` only when there are no bars.
    pub fn match_forward(&self, key: &SortKey) -> Option<BarMatch> {
        if self.order.is_empty() {
            return None;
        }
        let pos = self.keys.partition_point(|k| k < key);
        match self.order.get(pos) {
            Some(&index) => Some(BarMatch {
                index,
                kind: MatchKind::Forward,
            }),
            None => Some(BarMatch {
                index: self.order.len() - 1,
                kind: MatchKind::Fallback,
            }),
        }
    }
}
