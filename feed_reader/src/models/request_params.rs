use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    models::{asset::AssetClass, timeframe::TimeFrame},
    providers::alpaca_rest::params::AlpacaBarsParams,
};

/// Universal parameters for requesting time-series bar data from any market data provider.
///
/// This struct is vendor-agnostic and is the standard input for all
/// [`DataProvider`](crate::providers::DataProvider) implementations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BarsRequestParams {
    /// List of symbols to request (e.g., `["AAPL"]`, `["ESU24"]`).
    pub symbols: Vec<String>,

    /// The time interval for each bar (e.g., 1 minute, 1 day).
    ///
    /// **Validation of allowed values is performed by each data provider
    /// implementation, according to their own API rules.**
    pub timeframe: TimeFrame,

    /// Start of the requested time range (inclusive, UTC).
    pub start: DateTime<Utc>,

    /// End of the requested time range (exclusive, UTC).
    pub end: DateTime<Utc>,

    /// The asset class for the requested symbols.
    #[serde(default)]
    pub asset_class: AssetClass,

    /// Optional, provider-specific parameters.
    #[serde(default)]
    pub provider_specific: ProviderParams,
}

impl BarsRequestParams {
    /// Request for one equity symbol covering roughly the last `days` days.
    ///
    /// The start is pulled back to the first day of the month that contains
    /// `now - days`, so repeated runs within a month see the same first bar.
    pub fn trailing(
        symbol: impl Into<String>,
        timeframe: TimeFrame,
        days: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let back = (now - Duration::days(i64::from(days))).date_naive();
        let month_start = NaiveDate::from_ymd_opt(back.year(), back.month(), 1)
            .unwrap_or(back)
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default();

        Self {
            symbols: vec![symbol.into()],
            timeframe,
            start: Utc.from_utc_datetime(&month_start),
            end: now,
            asset_class: AssetClass::UsEquity,
            provider_specific: ProviderParams::None,
        }
    }
}

/// Provider-specific request parameters.
///
/// Lets callers set per-request options for a particular provider without
/// cluttering the universal `BarsRequestParams`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum ProviderParams {
    #[default]
    None,
    Alpaca(AlpacaBarsParams),
}
