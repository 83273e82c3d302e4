use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    config::Config,
    main_lib::AppState,
    models::{
        BootstrapRequest, ExchangeCurrency, ExchangeCurrencyUpdate, ExchangeRateRow,
        RefreshSummary, ScheduledJob, SyncRun,
    },
};

mod exchange_rates;
mod settings;
mod sync;

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz,
        exchange_rates::list_exchange_rates,
        exchange_rates::refresh_exchange_rates,
        settings::get_exchange_currency,
        settings::update_exchange_currency,
        settings::record_usage,
        sync::schedule_sync,
        sync::cancel_sync,
        sync::run_sync,
        sync::bootstrap,
    ),
    components(schemas(
        ExchangeRateRow,
        RefreshSummary,
        ExchangeCurrency,
        ExchangeCurrencyUpdate,
        ScheduledJob,
        SyncRun,
        BootstrapRequest,
    )),
    tags((name = "goldwallet"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(exchange_rates::router())
        .merge(settings::router())
        .merge(sync::router());

    Router::new()
        .nest("/api/v1", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors_layer(config))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
