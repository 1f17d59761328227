//! A chronologically ordered collection of bars for one symbol and timeframe.

use std::ops::Index;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::models::{bar::Bar, timeframe::TimeFrame};

/// Complete, ordered time-series data for a single symbol.
///
/// Timestamps are strictly increasing. The table is immutable once built;
/// consumers read it by position or by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTable {
    symbol: String,
    timeframe: TimeFrame,
    bars: Vec<Bar>,
}

impl BarTable {
    /// Builds a table from bars in any order.
    ///
    /// Bars are sorted by timestamp. When two bars share a timestamp the first
    /// one received is kept and the other is dropped with a warning, so a
    /// single bad record never aborts the whole table.
    pub fn new(symbol: impl Into<String>, timeframe: TimeFrame, mut bars: Vec<Bar>) -> Self {
        let symbol = symbol.into();
        // stable: among equal timestamps the earliest-received stays first
        bars.sort_by_key(|b| b.timestamp);

        let before = bars.len();
        bars.dedup_by(|later, earlier| later.timestamp == earlier.timestamp);
        let dropped = before - bars.len();
        if dropped > 0 {
            warn!(%symbol, dropped, "dropped bars with duplicate timestamps");
        }

        Self {
            symbol,
            timeframe,
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> &TimeFrame {
        &self.timeframe
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bar at position `index`, oldest first.
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Position of the bar stamped exactly `timestamp`.
    pub fn position_of(&self, timestamp: DateTime<Utc>) -> Option<usize> {
        self.bars
            .binary_search_by_key(&timestamp, |b| b.timestamp)
            .ok()
    }

    /// Bar stamped exactly `timestamp`.
    pub fn at(&self, timestamp: DateTime<Utc>) -> Option<&Bar> {
        self.position_of(timestamp).map(|i| &self.bars[i])
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Closing prices in chronological order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }
}

impl Index<usize> for BarTable {
    type Output = Bar;

    fn index(&self, index: usize) -> &Self::Output {
        &self.bars[index]
    }
}

impl<'a> IntoIterator for &'a BarTable {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
