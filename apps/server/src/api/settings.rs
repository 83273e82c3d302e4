use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use goldwallet_rates::RateRow;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{ExchangeCurrency, ExchangeCurrencyUpdate, ExchangeRateRow},
};

fn exchange_currency(state: &AppState, currency_code: Option<String>) -> ExchangeCurrency {
    let rate = state
        .rate_cache
        .best_rate(currency_code.as_deref())
        .map(|rate| ExchangeRateRow::from(RateRow::from(&rate)));
    ExchangeCurrency {
        currency_code,
        rate,
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/settings/exchange-currency",
    responses((status = 200, body = ExchangeCurrency))
)]
pub async fn get_exchange_currency(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ExchangeCurrency>> {
    let code = state.configuration.exchange_currency_code()?;
    Ok(Json(exchange_currency(&state, code)))
}

#[utoipa::path(
    put,
    path = "/api/v1/settings/exchange-currency",
    request_body = ExchangeCurrencyUpdate,
    responses((status = 200, body = ExchangeCurrency), (status = 400, description = "Invalid currency code"))
)]
pub async fn update_exchange_currency(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ExchangeCurrencyUpdate>,
) -> ApiResult<Json<ExchangeCurrency>> {
    let code = state
        .configuration
        .set_exchange_currency_code(payload.currency_code.as_deref())?;

    // Keep the persisted fallback in line with the new selection.
    if let Some(rate) = state.rate_cache.best_rate(code.as_deref()) {
        state.configuration.set_cached_exchange_rate(&rate)?;
    }

    tracing::info!("Exchange currency set to {:?}", code);
    Ok(Json(exchange_currency(&state, code)))
}

#[utoipa::path(post, path = "/api/v1/usage", responses((status = 204)))]
pub async fn record_usage(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    state.configuration.touch_last_used(Utc::now())?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/settings/exchange-currency",
            get(get_exchange_currency).put(update_exchange_currency),
        )
        .route("/usage", post(record_usage))
}
