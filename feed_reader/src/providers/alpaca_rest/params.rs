use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::{
    models::{
        asset::AssetClass,
        request_params::{BarsRequestParams, ProviderParams},
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{ProviderError, ValidationSnafu},
};

/// Specifies the corporate action adjustment for stock data.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    #[default]
    Raw,
    Split,
    Dividend,
    All,
}

impl Adjustment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Adjustment::Raw => "raw",
            Adjustment::Split => "split",
            Adjustment::Dividend => "dividend",
            Adjustment::All => "all",
        }
    }
}

/// Specifies the source feed for stock data.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    #[default]
    Sip,
    Iex,
    Otc,
}

impl Feed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feed::Sip => "sip",
            Feed::Iex => "iex",
            Feed::Otc => "otc",
        }
    }
}

/// Specifies the sort order for the bars.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    #[default]
    Asc,
    Desc,
}

impl Sort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Asc => "asc",
            Sort::Desc => "desc",
        }
    }
}

/// Alpaca-specific parameters for a bars request.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AlpacaBarsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<Adjustment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<Feed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
}

/// Checks a timeframe against the combinations Alpaca accepts.
pub fn validate_timeframe(tf: &TimeFrame) -> Result<(), ProviderError> {
    let message = match tf.unit {
        TimeFrameUnit::Minute if !(1..=59).contains(&tf.amount) => {
            "Minute units can only be used with amounts between 1-59"
        }
        TimeFrameUnit::Hour if !(1..=23).contains(&tf.amount) => {
            "Hour units can only be used with amounts 1-23"
        }
        TimeFrameUnit::Day | TimeFrameUnit::Week if tf.amount != 1 => {
            "Day and Week units can only be used with amount 1"
        }
        TimeFrameUnit::Month if ![1, 2, 3, 4, 6, 12].contains(&tf.amount) => {
            "Month units can only be used with amount 1, 2, 3, 4, 6 and 12"
        }
        _ => return Ok(()),
    };
    ValidationSnafu { message }.fail()
}

/// Validates the universal request before anything goes on the wire.
pub fn validate_request(params: &BarsRequestParams) -> Result<(), ProviderError> {
    if params.symbols.iter().all(|s| s.trim().is_empty()) {
        return ValidationSnafu {
            message: "at least one symbol is required",
        }
        .fail();
    }
    if params.asset_class != AssetClass::UsEquity {
        return ValidationSnafu {
            message: format!("the stock bars endpoint does not serve {:?}", params.asset_class),
        }
        .fail();
    }
    if params.start >= params.end {
        return ValidationSnafu {
            message: format!("start {} must be before end {}", params.start, params.end),
        }
        .fail();
    }
    validate_timeframe(&params.timeframe)
}

/// Alpaca's wire form of a timeframe (`5Min`, `1Hour`, `1Day`, `1Week`, `3Month`).
pub fn timeframe_param(tf: &TimeFrame) -> String {
    let unit = match tf.unit {
        TimeFrameUnit::Minute => "Min",
        TimeFrameUnit::Hour => "Hour",
        TimeFrameUnit::Day => "Day",
        TimeFrameUnit::Week => "Week",
        TimeFrameUnit::Month => "Month",
    };
    format!("{}{unit}", tf.amount)
}

/// Builds the query string pairs for `GET /v2/stocks/bars`, without the page token.
pub fn construct_params(params: &BarsRequestParams) -> Vec<(String, String)> {
    let symbols: Vec<&str> = params
        .symbols
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let mut query = vec![
        ("symbols".to_string(), symbols.join(",")),
        ("timeframe".to_string(), timeframe_param(&params.timeframe)),
        (
            "start".to_string(),
            params.start.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        (
            "end".to_string(),
            params.end.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
    ];

    if let ProviderParams::Alpaca(alpaca) = &params.provider_specific {
        if let Some(adjustment) = alpaca.adjustment {
            query.push(("adjustment".to_string(), adjustment.as_str().to_string()));
        }
        if let Some(feed) = alpaca.feed {
            query.push(("feed".to_string(), feed.as_str().to_string()));
        }
        if let Some(currency) = &alpaca.currency {
            query.push(("currency".to_string(), currency.clone()));
        }
        if let Some(limit) = alpaca.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(sort) = alpaca.sort {
            query.push(("sort".to_string(), sort.as_str().to_string()));
        }
    }

    query
}
