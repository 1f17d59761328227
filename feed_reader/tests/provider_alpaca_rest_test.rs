use chrono::{Duration, Utc};
use feed_reader::{
    models::{
        asset::AssetClass,
        request_params::{BarsRequestParams, ProviderParams},
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{
        DataProvider, ProviderError,
        alpaca_rest::{
            AlpacaProvider,
            params::{AlpacaBarsParams, Feed},
        },
    },
};
use serial_test::serial;

fn keys_present() -> bool {
    dotenvy::dotenv().ok();
    std::env::var("APCA_API_KEY_ID").is_ok() && std::env::var("APCA_API_SECRET_KEY").is_ok()
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_alpaca_provider_fetch_bars() {
    if !keys_present() {
        println!("Skipping test_alpaca_provider_fetch_bars: API keys not set.");
        return;
    }

    let provider = AlpacaProvider::new().expect("Failed to create AlpacaProvider");

    let params = BarsRequestParams {
        symbols: vec!["AAPL".to_string()],
        timeframe: TimeFrame::new(1, TimeFrameUnit::Day),
        start: Utc::now() - Duration::days(30),
        end: Utc::now() - Duration::days(1),
        asset_class: AssetClass::UsEquity,
        provider_specific: ProviderParams::Alpaca(AlpacaBarsParams {
            feed: Some(Feed::Iex),
            limit: Some(5),
            ..Default::default()
        }),
    };

    let tables = provider
        .fetch_bars(params)
        .await
        .expect("fetch_bars returned an error");
    assert_eq!(tables.len(), 1, "Expected 1 BarTable for AAPL");

    let aapl = &tables[0];
    assert_eq!(aapl.symbol(), "AAPL");
    assert!(!aapl.is_empty(), "Expected to fetch at least one bar for AAPL");
    // limit=5 pages through the whole range, result stays ordered
    assert!(aapl.bars().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_alpaca_provider_rejects_bad_timeframe() {
    if !keys_present() {
        return;
    }

    let provider = AlpacaProvider::new().expect("Failed to create AlpacaProvider");
    let params =
        BarsRequestParams::trailing("AAPL", TimeFrame::new(2, TimeFrameUnit::Day), 10, Utc::now());

    let err = provider.fetch_bars(params).await.unwrap_err();
    assert!(matches!(err, ProviderError::Validation { .. }));
}
