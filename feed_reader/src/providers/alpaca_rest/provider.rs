use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use indexmap::IndexMap;
use nonzero_ext::nonzero;
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::ResultExt;
use tracing::{debug, info};

use crate::{
    models::{bar_table::BarTable, request_params::BarsRequestParams},
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, InvalidApiKeySnafu, MissingEnvVarSnafu,
        ProviderError, ProviderInitError, ReqwestSnafu,
        alpaca_rest::{
            params::{construct_params, validate_request},
            response::{AlpacaBar, AlpacaResponse, into_tables},
        },
    },
};

pub const BASE_URL: &str = "https://data.alpaca.markets/v2/stocks/bars";

pub struct AlpacaProvider {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
    _api_key: SecretString,
    _secret_key: SecretString,
}

impl AlpacaProvider {
    /// Creates a new Alpaca provider.
    ///
    /// Reads API keys from the `APCA_API_KEY_ID` and `APCA_API_SECRET_KEY`
    /// environment variables.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_base_url(BASE_URL)
    }

    /// Same as [`AlpacaProvider::new`] against a different bars endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderInitError> {
        let api_key = get_env_var("APCA_API_KEY_ID").context(MissingEnvVarSnafu)?;
        let secret_key = get_env_var("APCA_API_SECRET_KEY").context(MissingEnvVarSnafu)?;
        Self::with_credentials(
            base_url,
            SecretString::new(api_key.into()),
            SecretString::new(secret_key.into()),
        )
    }

    /// Builds a provider from explicit keys instead of the environment.
    pub fn with_credentials(
        base_url: impl Into<String>,
        api_key: SecretString,
        secret_key: SecretString,
    ) -> Result<Self, ProviderInitError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(api_key.expose_secret()).context(InvalidApiKeySnafu)?,
        );
        let mut secret =
            header::HeaderValue::from_str(secret_key.expose_secret()).context(InvalidApiKeySnafu)?;
        secret.set_sensitive(true);
        headers.insert("APCA-API-SECRET-KEY", secret);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context(ClientBuildSnafu)?;

        // Alpaca's free plan allows 200 requests per minute.
        let limiter = RateLimiter::direct(Quota::per_minute(nonzero!(200u32)));

        Ok(Self {
            client,
            base_url: base_url.into(),
            limiter,
            _api_key: api_key,
            _secret_key: secret_key,
        })
    }
}

#[async_trait]
impl DataProvider for AlpacaProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarTable>, ProviderError> {
        validate_request(&params)?;

        let mut all_bars: IndexMap<String, Vec<AlpacaBar>> = IndexMap::new();
        let mut next_page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut query_params = construct_params(&params);
            if let Some(token) = &next_page_token {
                query_params.push(("page_token".to_string(), token.clone()));
            }

            self.limiter.until_ready().await;
            let response = self
                .client
                .get(&self.base_url)
                .query(&query_params)
                .send()
                .await
                .context(ReqwestSnafu)?;

            let status = response.status();
            if !status.is_success() {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown API error".to_string());
                return ApiSnafu {
                    status: status.as_u16(),
                    message,
                }
                .fail();
            }

            let page = response.json::<AlpacaResponse>().await.context(ReqwestSnafu)?;
            pages += 1;

            for (symbol, bars) in page.bars.unwrap_or_default() {
                all_bars.entry(symbol).or_default().extend(bars);
            }

            match page.next_page_token {
                Some(token) => {
                    debug!(pages, "following next_page_token");
                    next_page_token = Some(token);
                }
                None => break,
            }
        }

        let tables = into_tables(all_bars, &params.timeframe);
        info!(
            pages,
            symbols = tables.len(),
            bars = tables.iter().map(BarTable::len).sum::<usize>(),
            timeframe = %params.timeframe,
            "fetched bars from alpaca"
        );
        Ok(tables)
    }
}
