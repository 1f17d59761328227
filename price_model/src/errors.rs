use chrono::{DateTime, Utc};
use shared_utils::config::ConfigError;
use thiserror::Error;

use crate::{learner::LearnerError, metrics::MetricsError, scaling::ScaleError};

/// The unified error type for the `price_model` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Not enough rows to fill a window and leave a target after it.
    #[error(
        "insufficient data: {rows} rows (training cutoff {cutoff}) \
         cannot fill a window of {window_length} plus a target"
    )]
    InsufficientData {
        rows: usize,
        cutoff: usize,
        window_length: usize,
    },

    #[error("window length must be greater than zero")]
    InvalidWindowLength,

    #[error("train fraction must be in (0, 1], got {0}")]
    InvalidTrainFraction(f64),

    /// The fractional move divides by the close, which was zero.
    #[error("fractional move undefined for bar at {timestamp}: close price is zero")]
    DivisionUndefined { timestamp: DateTime<Utc> },

    #[error("Scaling error: {0}")]
    Scale(#[from] ScaleError),

    #[error("Learner error: {0}")]
    Learner(#[from] LearnerError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
