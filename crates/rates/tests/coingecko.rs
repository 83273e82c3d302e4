use mockito::Matcher;
use std::sync::Arc;

use goldwallet_rates::{
    CoinGeckoConfig, CoinGeckoProvider, Freshness, MemoryFallbackStore, RateCacheConfig,
    RateCacheService, RateError, RateFilter, RateProvider, RefreshOutcome, COIN,
};

const GOLDCOIN_BODY: &str = r#"{
    "id": "goldcoin",
    "symbol": "glc",
    "name": "Goldcoin",
    "market_data": {
        "current_price": {
            "usd": 1.23,
            "eur": 1.05,
            "jpy": 180.5,
            "glc": 1.0,
            "btc": 0.0000201
        }
    }
}"#;

fn provider_for(server: &mockito::ServerGuard) -> CoinGeckoProvider {
    CoinGeckoProvider::new(CoinGeckoConfig {
        base_url: server.url(),
        ..CoinGeckoConfig::default()
    })
}

#[tokio::test]
async fn fetches_and_converts_current_prices() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/coins/goldcoin")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("localization".into(), "false".into()),
            Matcher::UrlEncoded("sparkline".into(), "false".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(GOLDCOIN_BODY)
        .create_async()
        .await;

    let snapshot = provider_for(&server).fetch_rates().await.unwrap();
    mock.assert_async().await;

    // The coin's own unit is dropped, and so is a price below the fiat resolution.
    let codes: Vec<&str> = snapshot.codes().collect();
    assert_eq!(codes, vec!["EUR", "JPY", "USD"]);

    let usd = snapshot.get("USD").unwrap();
    assert_eq!(usd.rate.coin, COIN);
    assert_eq!(usd.rate.fiat, 12300);
    assert_eq!(usd.source, "CoinGecko.com");
    assert_eq!(snapshot.get("JPY").unwrap().rate.fiat, 1_805_000);
    assert!(snapshot.iter().all(|rate| rate.rate.is_positive()));
}

#[tokio::test]
async fn server_error_is_reported_with_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/coins/goldcoin")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let err = provider_for(&server).fetch_rates().await.unwrap_err();
    assert!(matches!(err, RateError::HttpStatus { status: 500, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn other_coin_document_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/coins/goldcoin")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id": "bitcoin", "market_data": {"current_price": {"usd": 60000}}}"#)
        .create_async()
        .await;

    let err = provider_for(&server).fetch_rates().await.unwrap_err();
    assert!(matches!(err, RateError::UnexpectedShape { .. }));
}

#[tokio::test]
async fn upstream_failure_leaves_cache_untouched() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("GET", "/coins/goldcoin")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(GOLDCOIN_BODY)
        .expect(1)
        .create_async()
        .await;

    let service = RateCacheService::start(
        Arc::new(provider_for(&server)),
        Arc::new(MemoryFallbackStore::new()),
        RateCacheConfig::default(),
    );

    assert!(service.refresh().await.is_refreshed());
    ok.assert_async().await;
    ok.remove_async().await;

    let snapshot_before = service.snapshot();
    let updated_before = service.last_updated_at();

    server
        .mock("GET", "/coins/goldcoin")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let outcome = service.refresh().await;
    assert!(matches!(outcome, RefreshOutcome::Failed(_)));
    assert_eq!(service.snapshot(), snapshot_before);
    assert_eq!(service.last_updated_at(), updated_before);

    let rows = service
        .query(&RateFilter::Code("EUR".to_string()), Freshness::Offline)
        .await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rate_fiat, 10500);
}
