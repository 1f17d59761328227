//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, which serves as a unified interface
//! for fetching time-series bar data from any market data vendor.
//!
//! Each concrete provider implementation (such as [`alpaca_rest::AlpacaProvider`])
//! handles vendor-specific API logic, validation, and the renaming of the
//! vendor's field names into the canonical [`Bar`](crate::models::bar::Bar).
//!
//! The trait is designed for async usage and supports dynamic dispatch (`dyn DataProvider`)
//! for runtime selection of providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use feed_reader::models::{bar_table::BarTable, request_params::BarsRequestParams};
//! use feed_reader::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_bars(
//!         &self,
//!         _params: BarsRequestParams,
//!     ) -> Result<Vec<BarTable>, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

pub mod alpaca_rest;

use async_trait::async_trait;
use shared_utils::env::MissingEnvVarError;
use snafu::{Backtrace, Snafu};

use crate::models::{bar_table::BarTable, request_params::BarsRequestParams};

/// Trait for fetching time-series bar data from a market data provider.
#[async_trait]
pub trait DataProvider {
    /// Fetches time-series bar data for the given request parameters.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<BarTable>)` - One chronologically ordered table per symbol.
    /// * `Err(ProviderError)` - If the request fails. There is no retry.
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarTable>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// missed environment variable.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains invalid characters.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned a specific error message (e.g., invalid API key).
    #[snafu(display("API error ({status}): {message}"))]
    Api {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{
        asset::AssetClass,
        bar::Bar,
        request_params::ProviderParams,
        timeframe::{TimeFrame, TimeFrameUnit},
    };

    struct FixedProvider;
    struct EmptyProvider;

    #[async_trait]
    impl DataProvider for FixedProvider {
        async fn fetch_bars(
            &self,
            params: BarsRequestParams,
        ) -> Result<Vec<BarTable>, ProviderError> {
            Ok(params
                .symbols
                .into_iter()
                .map(|s| {
                    let bar = Bar::new(params.start, 1.0, 2.0, 0.5, 1.5, 10.0);
                    BarTable::new(s, params.timeframe.clone(), vec![bar])
                })
                .collect())
        }
    }

    #[async_trait]
    impl DataProvider for EmptyProvider {
        async fn fetch_bars(
            &self,
            _params: BarsRequestParams,
        ) -> Result<Vec<BarTable>, ProviderError> {
            Ok(vec![])
        }
    }

    // Decides at runtime which provider to hand back.
    fn get_provider(name: &str) -> Box<dyn DataProvider + Send + Sync> {
        if name == "fixed" {
            Box::new(FixedProvider)
        } else {
            Box::new(EmptyProvider)
        }
    }

    fn params() -> BarsRequestParams {
        BarsRequestParams {
            symbols: vec!["MSFT".to_string(), "AAPL".to_string()],
            timeframe: TimeFrame::new(1, TimeFrameUnit::Day),
            start: Utc::now(),
            end: Utc::now(),
            asset_class: AssetClass::UsEquity,
            provider_specific: ProviderParams::None,
        }
    }

    #[tokio::test]
    async fn test_dynamic_provider() {
        let tables = get_provider("fixed").fetch_bars(params()).await.unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].symbol(), "MSFT");
        assert_eq!(tables[1].len(), 1);

        let empty = get_provider("other").fetch_bars(params()).await.unwrap();
        assert!(empty.is_empty());
    }
}
