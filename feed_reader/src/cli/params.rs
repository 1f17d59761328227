use chrono::{DateTime, Utc};

use crate::{
    errors::Error,
    models::{
        asset::AssetClass,
        request_params::{BarsRequestParams, ProviderParams},
        timeframe::TimeFrame,
    },
};

/// Splits a comma-separated symbol list, dropping blanks.
pub fn parse_symbols(symbols: &str) -> Vec<String> {
    symbols
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn parse_datetime(value: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(value.parse::<DateTime<Utc>>()?)
}

pub fn build_request(
    symbols: &str,
    amount: u32,
    unit: &str,
    start: &str,
    end: &str,
) -> anyhow::Result<BarsRequestParams> {
    let timeframe = TimeFrame::from_parts(amount, unit).map_err(Error::from)?;
    Ok(BarsRequestParams {
        symbols: parse_symbols(symbols),
        timeframe,
        start: parse_datetime(start)?,
        end: parse_datetime(end)?,
        asset_class: AssetClass::UsEquity,
        provider_specific: ProviderParams::None,
    })
}
