//! Labels a bar's intrabar move as buy, hold or sell.

use std::fmt;

use feed_reader::models::{bar::Bar, bar_table::BarTable};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveLabel {
    Buy,
    Hold,
    Sell,
}

impl MoveLabel {
    /// `Buy = [1, 0, 0]`, `Hold = [0, 1, 0]`, `Sell = [0, 0, 1]`.
    pub fn one_hot(self) -> [u8; 3] {
        match self {
            MoveLabel::Buy => [1, 0, 0],
            MoveLabel::Hold => [0, 1, 0],
            MoveLabel::Sell => [0, 0, 1],
        }
    }
}

impl fmt::Display for MoveLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MoveLabel::Buy => "buy",
            MoveLabel::Hold => "hold",
            MoveLabel::Sell => "sell",
        };
        write!(f, "{s}")
    }
}

/// Fractional-move bounds. `sell` is normally negative and `buy` positive,
/// but the pair is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Thresholds {
    pub sell: f64,
    pub buy: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { sell: -0.01, buy: 0.01 }
    }
}

/// `(close - open) / close`.
pub fn fractional_move(bar: &Bar) -> Result<f64, Error> {
    if bar.close == 0.0 {
        return Err(Error::DivisionUndefined { timestamp: bar.timestamp });
    }
    Ok((bar.close - bar.open) / bar.close)
}

/// Buy above `buy_threshold`, otherwise sell below `sell_threshold`, otherwise hold.
pub fn classify_move(
    bar: &Bar,
    sell_threshold: f64,
    buy_threshold: f64,
) -> Result<MoveLabel, Error> {
    let fraction = fractional_move(bar)?;
    let label = if fraction > buy_threshold {
        MoveLabel::Buy
    } else if fraction < sell_threshold {
        MoveLabel::Sell
    } else {
        MoveLabel::Hold
    };
    debug!(timestamp = %bar.timestamp, fraction, %label, "classified bar");
    Ok(label)
}

/// Labels every bar in order; the first zero close aborts.
pub fn label_table(table: &BarTable, thresholds: &Thresholds) -> Result<Vec<MoveLabel>, Error> {
    table
        .iter()
        .map(|bar| classify_move(bar, thresholds.sell, thresholds.buy))
        .collect()
}
