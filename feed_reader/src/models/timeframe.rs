//! Bar intervals expressed as amount × unit.
//!
//! A [`TimeFrame`] is vendor-agnostic. It parses and prints the short CLI
//! form (`"5m"`, `"3h"`, `"1D"`, `"1W"`, `"6M"`); providers translate it to
//! their own wire format and decide which combinations they accept.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimeFrameError {
    #[error("Invalid amount for {:?}: {}", unit, message)]
    InvalidAmount {
        unit: TimeFrameUnit,
        message: String,
    },

    #[error("Invalid input: {}", message)]
    InvalidInput { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFrameUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFrame {
    pub amount: u32,
    pub unit: TimeFrameUnit,
}

impl TimeFrame {
    pub fn new(amount: u32, unit: TimeFrameUnit) -> Self {
        Self { amount, unit }
    }

    pub fn day() -> Self {
        Self::new(1, TimeFrameUnit::Day)
    }

    /// Builds a timeframe from a numeric amount and a loose unit name
    /// (`m`/`min`/`minute`, `h`/`hr`/`hour`, `d`/`day`, `w`/`wk`/`week`,
    /// `M`/`mo`/`month`).
    pub fn from_parts(amount: u32, unit: &str) -> Result<Self, TimeFrameError> {
        if amount == 0 {
            return Err(TimeFrameError::InvalidInput {
                message: "timeframe amount must be > 0".into(),
            });
        }
        let unit = unit.trim();
        // "M" is month, every other spelling is case-insensitive
        let unit = match unit {
            "M" => TimeFrameUnit::Month,
            _ => match unit.to_lowercase().as_str() {
                "m" | "min" | "minute" => TimeFrameUnit::Minute,
                "h" | "hr" | "hour" => TimeFrameUnit::Hour,
                "d" | "day" => TimeFrameUnit::Day,
                "w" | "wk" | "week" => TimeFrameUnit::Week,
                "mo" | "month" => TimeFrameUnit::Month,
                _ => {
                    return Err(TimeFrameError::InvalidInput {
                        message: format!("Invalid timeframe unit: {unit}"),
                    });
                }
            },
        };
        Ok(Self::new(amount, unit))
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = match self.unit {
            TimeFrameUnit::Minute => "m",
            TimeFrameUnit::Hour => "h",
            TimeFrameUnit::Day => "D",
            TimeFrameUnit::Week => "W",
            TimeFrameUnit::Month => "M",
        };
        write!(f, "{}{u}", self.amount)
    }
}

impl FromStr for TimeFrame {
    type Err = TimeFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // very small parser: 5m / 3h / 1D / 1W / 6M
        let s = s.trim();
        let Some(last) = s.chars().last() else {
            return Err(TimeFrameError::InvalidInput {
                message: "empty timeframe".into(),
            });
        };
        let (digits, unit) = s.split_at(s.len() - last.len_utf8());
        let amount: u32 = digits.parse().map_err(|_| TimeFrameError::InvalidInput {
            message: format!("invalid timeframe amount in {s:?}"),
        })?;
        let unit = match unit {
            "m" => TimeFrameUnit::Minute,
            "h" => TimeFrameUnit::Hour,
            "D" => TimeFrameUnit::Day,
            "W" => TimeFrameUnit::Week,
            "M" => TimeFrameUnit::Month,
            _ => {
                return Err(TimeFrameError::InvalidInput {
                    message: format!("unknown unit: {unit}"),
                });
            }
        };
        if amount == 0 {
            return Err(TimeFrameError::InvalidAmount {
                unit,
                message: "amount must be > 0".into(),
            });
        }
        Ok(Self::new(amount, unit))
    }
}
