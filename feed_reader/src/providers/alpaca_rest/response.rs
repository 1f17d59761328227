use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::warn;

use crate::{
    errors::RecordError,
    models::{bar::Bar, bar_table::BarTable, timeframe::TimeFrame},
};

/// One bar as Alpaca sends it, with abbreviated keys.
///
/// Every field is optional here so that a single incomplete record can be
/// rejected on its own instead of failing the whole page.
#[derive(Deserialize, Debug, Default)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "o")]
    pub open: Option<f64>,
    #[serde(rename = "h")]
    pub high: Option<f64>,
    #[serde(rename = "l")]
    pub low: Option<f64>,
    #[serde(rename = "c")]
    pub close: Option<f64>,
    #[serde(rename = "v")]
    pub volume: Option<f64>,
    #[serde(rename = "n")]
    pub trade_count: Option<u64>,
    #[serde(rename = "vw")]
    pub vwap: Option<f64>,
}

#[derive(Deserialize, Debug)]
pub struct AlpacaResponse {
    /// `null` when the range holds no data.
    pub bars: Option<IndexMap<String, Vec<AlpacaBar>>>,
    pub next_page_token: Option<String>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, RecordError> {
    value.ok_or(RecordError::MissingField { field })
}

impl TryFrom<AlpacaBar> for Bar {
    type Error = RecordError;

    fn try_from(raw: AlpacaBar) -> Result<Self, Self::Error> {
        Ok(Bar {
            timestamp: required(raw.timestamp, "timestamp")?,
            open: required(raw.open, "open")?,
            high: required(raw.high, "high")?,
            low: required(raw.low, "low")?,
            close: required(raw.close, "close")?,
            volume: required(raw.volume, "volume")?,
            trade_count: raw.trade_count,
            vwap: raw.vwap,
        })
    }
}

/// Converts accumulated raw pages into one [`BarTable`] per symbol.
///
/// Records missing a required field are logged and skipped.
pub fn into_tables(raw: IndexMap<String, Vec<AlpacaBar>>, timeframe: &TimeFrame) -> Vec<BarTable> {
    raw.into_iter()
        .map(|(symbol, records)| {
            let bars = records
                .into_iter()
                .enumerate()
                .filter_map(|(row, record)| match Bar::try_from(record) {
                    Ok(bar) => Some(bar),
                    Err(err) => {
                        warn!(%symbol, row, %err, "skipping malformed bar record");
                        None
                    }
                })
                .collect();
            BarTable::new(symbol, timeframe.clone(), bars)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "bars": {
            "MSFT": [
                {"t": "2025-01-03T05:00:00Z", "o": 421.0, "h": 424.0, "l": 419.5, "c": 423.4, "v": 16000000, "n": 210000, "vw": 422.1},
                {"t": "2025-01-02T05:00:00Z", "o": 425.5, "h": 426.0, "l": 416.7, "c": 418.6, "v": 16900000, "n": 220000, "vw": 420.3},
                {"t": "2025-01-06T05:00:00Z", "o": 428.0, "h": 434.3, "l": 425.3, "v": 20500000}
            ]
        },
        "next_page_token": "TVNGVHwyMDI1"
    }"#;

    #[test]
    fn renames_abbreviated_keys() {
        let response: AlpacaResponse = serde_json::from_str(PAGE).unwrap();
        assert_eq!(response.next_page_token.as_deref(), Some("TVNGVHwyMDI1"));

        let tables = into_tables(response.bars.unwrap(), &TimeFrame::day());
        assert_eq!(tables.len(), 1);

        let msft = &tables[0];
        assert_eq!(msft.symbol(), "MSFT");
        // third record lacks "c" and is skipped, the rest come out sorted
        assert_eq!(msft.len(), 2);
        assert_eq!(msft[0].close, 418.6);
        assert_eq!(msft[0].trade_count, Some(220000));
        assert_eq!(msft[1].vwap, Some(422.1));
    }

    #[test]
    fn null_bars_means_no_data() {
        let response: AlpacaResponse =
            serde_json::from_str(r#"{"bars": null, "next_page_token": null}"#).unwrap();
        assert!(response.bars.is_none());
        assert!(response.next_page_token.is_none());
    }

    #[test]
    fn missing_field_is_named() {
        let err = Bar::try_from(AlpacaBar {
            timestamp: Some(Utc::now()),
            open: Some(1.0),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, RecordError::MissingField { field: "high" });
    }
}
