use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use goldwallet_rates::{Freshness, RateFilter};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{ExchangeRateRow, RefreshSummary},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RatesQuery {
    /// Case-insensitive search over codes and currency symbols
    pub q: Option<String>,
    /// One currency, resolved through the fallback chain
    pub code: Option<String>,
    /// Answer from the cache without refreshing
    pub offline: Option<String>,
}

impl RatesQuery {
    fn filter(&self) -> ApiResult<RateFilter> {
        let q = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
        let code = self
            .code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty());
        match (q, code) {
            (Some(_), Some(_)) => Err(ApiError::BadRequest(
                "q and code cannot be combined".to_string(),
            )),
            (Some(q), None) => Ok(RateFilter::Search(q.to_string())),
            (None, Some(code)) => Ok(RateFilter::Code(code.to_ascii_uppercase())),
            (None, None) => Ok(RateFilter::All),
        }
    }

    fn freshness(&self) -> Freshness {
        match self.offline.as_deref().map(str::trim) {
            Some("1") | Some("true") | Some("") => Freshness::Offline,
            _ => Freshness::Live,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/exchange-rates",
    params(RatesQuery),
    responses((status = 200, body = [ExchangeRateRow]), (status = 400, description = "Conflicting filters"))
)]
pub async fn list_exchange_rates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RatesQuery>,
) -> ApiResult<Json<Vec<ExchangeRateRow>>> {
    let filter = query.filter()?;
    let rows = state.rate_cache.query(&filter, query.freshness()).await;
    Ok(Json(rows.into_iter().map(ExchangeRateRow::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/exchange-rates/refresh",
    responses((status = 200, body = RefreshSummary))
)]
pub async fn refresh_exchange_rates(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RefreshSummary>> {
    let outcome = state.rate_cache.refresh().await;
    let currency_count = state
        .rate_cache
        .snapshot()
        .map(|snapshot| snapshot.len())
        .unwrap_or(0);
    Ok(Json(RefreshSummary::new(
        &outcome,
        currency_count,
        state.rate_cache.last_updated_at(),
    )))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/exchange-rates", get(list_exchange_rates))
        .route("/exchange-rates/refresh", post(refresh_exchange_rates))
}
