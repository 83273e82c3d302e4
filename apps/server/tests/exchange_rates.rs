mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{build_app, json_body, send, test_config, FixedProvider, StubDevice, SOURCE};
use goldwallet_core::settings::{Configuration, FileSettingsStore};
use goldwallet_rates::ExchangeRate;
use tempfile::tempdir;

fn rates() -> FixedProvider {
    FixedProvider::new(&[("USD", 12300), ("EUR", 10500), ("CHF", 11000)])
}

fn configuration_at(path: &std::path::Path) -> Configuration {
    Configuration::new(Arc::new(FileSettingsStore::new(path)))
}

#[tokio::test]
async fn healthz_works() {
    let tmp = tempdir().unwrap();
    let app = build_app(&test_config(tmp.path()), rates(), StubDevice::healthy()).await;

    let response = send(&app.router, Method::GET, "/api/v1/healthz", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn live_query_fetches_once_and_lists_by_code() {
    let tmp = tempdir().unwrap();
    let app = build_app(&test_config(tmp.path()), rates(), StubDevice::healthy()).await;

    let response = send(&app.router, Method::GET, "/api/v1/exchange-rates", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let codes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["currencyCode"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["CHF", "EUR", "USD"]);
    assert_eq!(body[2]["rateFiat"], 12300);
    assert_eq!(body[2]["rateCoin"], 100_000_000);
    assert_eq!(body[2]["source"], SOURCE);

    // Fresh snapshot: the second live query stays off the network.
    send(&app.router, Method::GET, "/api/v1/exchange-rates", None).await;
    assert_eq!(app.provider.calls(), 1);
}

#[tokio::test]
async fn offline_query_serves_persisted_rate() {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path());
    configuration_at(&config.settings_file)
        .set_cached_exchange_rate(&ExchangeRate::new("EUR", 10500, SOURCE))
        .unwrap();

    let app = build_app(&config, rates(), StubDevice::healthy()).await;
    let response = send(
        &app.router,
        Method::GET,
        "/api/v1/exchange-rates?offline=1",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["currencyCode"], "EUR");
    assert_eq!(body[0]["rateFiat"], 10500);
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn code_query_falls_back_to_default_currency() {
    let tmp = tempdir().unwrap();
    let app = build_app(&test_config(tmp.path()), rates(), StubDevice::healthy()).await;

    let response = send(
        &app.router,
        Method::GET,
        "/api/v1/exchange-rates?code=jpy",
        None,
    )
    .await;
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["currencyCode"], "USD");
}

#[tokio::test]
async fn search_and_code_together_is_bad_request() {
    let tmp = tempdir().unwrap();
    let app = build_app(&test_config(tmp.path()), rates(), StubDevice::healthy()).await;

    let response = send(
        &app.router,
        Method::GET,
        "/api/v1/exchange-rates?q=eu&code=EUR",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], 400);
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn forced_refresh_reports_outcome() {
    let tmp = tempdir().unwrap();
    let app = build_app(&test_config(tmp.path()), rates(), StubDevice::healthy()).await;

    let response = send(&app.router, Method::POST, "/api/v1/exchange-rates/refresh", None).await;
    let body = json_body(response).await;
    assert_eq!(body["status"], "REFRESHED");
    assert_eq!(body["currencyCount"], 3);
    assert!(body["lastUpdatedAt"].is_string());

    app.provider.fail.store(true, Ordering::SeqCst);
    let response = send(&app.router, Method::POST, "/api/v1/exchange-rates/refresh", None).await;
    let body = json_body(response).await;
    assert_eq!(body["status"], "FAILED");
    assert_eq!(body["currencyCount"], 3);
    assert!(body["error"].as_str().unwrap().contains("503"));

    // The failed refresh left the snapshot alone.
    let response = send(
        &app.router,
        Method::GET,
        "/api/v1/exchange-rates?offline=1&q=usd",
        None,
    )
    .await;
    let body = json_body(response).await;
    assert_eq!(body[0]["currencyCode"], "USD");
}

#[tokio::test]
async fn exchange_currency_update_persists_rate() {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path());
    let app = build_app(&config, rates(), StubDevice::healthy()).await;
    send(&app.router, Method::GET, "/api/v1/exchange-rates", None).await;

    let response = send(
        &app.router,
        Method::PUT,
        "/api/v1/settings/exchange-currency",
        Some(serde_json::json!({ "currencyCode": "chf" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["currencyCode"], "CHF");
    assert_eq!(body["rate"]["currencyCode"], "CHF");

    let response = send(
        &app.router,
        Method::GET,
        "/api/v1/settings/exchange-currency",
        None,
    )
    .await;
    let body = json_body(response).await;
    assert_eq!(body["currencyCode"], "CHF");

    let stored = configuration_at(&config.settings_file);
    assert_eq!(stored.exchange_currency_code().unwrap().as_deref(), Some("CHF"));
    assert_eq!(
        stored.cached_exchange_rate().unwrap().unwrap().currency_code,
        "CHF"
    );
}

#[tokio::test]
async fn invalid_exchange_currency_is_rejected() {
    let tmp = tempdir().unwrap();
    let app = build_app(&test_config(tmp.path()), rates(), StubDevice::healthy()).await;

    let response = send(
        &app.router,
        Method::PUT,
        "/api/v1/settings/exchange-currency",
        Some(serde_json::json!({ "currencyCode": "not a code!" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(start_paused = true)]
async fn hung_upstream_answers_from_cache() {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path());
    configuration_at(&config.settings_file)
        .set_cached_exchange_rate(&ExchangeRate::new("EUR", 10500, SOURCE))
        .unwrap();

    let app = build_app(&config, rates(), StubDevice::healthy()).await;
    app.provider.hang.store(true, Ordering::SeqCst);

    let response = send(&app.router, Method::GET, "/api/v1/exchange-rates", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["currencyCode"], "EUR");
    assert_eq!(app.provider.calls(), 1);

    let response = send(&app.router, Method::POST, "/api/v1/exchange-rates/refresh", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "FAILED");
}

#[tokio::test]
async fn truncated_settings_file_does_not_block_startup() {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path());
    std::fs::write(
        &config.settings_file,
        r#"{"cachedExchangeRate": {"currencyCode": "EU"#,
    )
    .unwrap();

    let app = build_app(&config, rates(), StubDevice::healthy()).await;
    assert!(tmp.path().join("settings.json.malformed").exists());

    let response = send(
        &app.router,
        Method::GET,
        "/api/v1/exchange-rates?offline=1",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json_body(response).await.as_array().unwrap().is_empty());

    // The store is writable again.
    let response = send(
        &app.router,
        Method::PUT,
        "/api/v1/settings/exchange-currency",
        Some(serde_json::json!({ "currencyCode": "eur" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        configuration_at(&config.settings_file)
            .exchange_currency_code()
            .unwrap()
            .as_deref(),
        Some("EUR")
    );
}
