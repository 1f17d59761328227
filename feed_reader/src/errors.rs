use thiserror::Error;

use crate::{models::timeframe::TimeFrameError, providers::ProviderError};

/// The unified error type for the `feed_reader` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from a market data provider.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// An error while retrieving the news page.
    #[error("News error: {0}")]
    News(#[from] NewsError),

    /// An invalid bar interval.
    #[error("Timeframe error: {0}")]
    TimeFrame(#[from] TimeFrameError),
}

/// A single fetched record that cannot become a canonical row.
///
/// Never propagated past row-level processing: the collecting code logs it
/// and moves on to the next record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record is missing required field `{field}`")]
    MissingField { field: &'static str },
}

/// Errors while retrieving a news document.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("news page returned status {status}")]
    Status { status: u16 },

    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),
}
