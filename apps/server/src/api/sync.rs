use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use goldwallet_core::bootstrap::BootstrapEvent;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{BootstrapRequest, ScheduledJob, SyncRun},
    scheduler::run_sync_job,
};

#[utoipa::path(
    post,
    path = "/api/v1/sync/schedule",
    responses((status = 200, body = ScheduledJob))
)]
pub async fn schedule_sync(State(state): State<Arc<AppState>>) -> ApiResult<Json<ScheduledJob>> {
    state.sync_retry_attempts.store(0, Ordering::Release);
    let job = state.sync_service.schedule(Utc::now());
    Ok(Json(job.into()))
}

#[utoipa::path(delete, path = "/api/v1/sync/schedule", responses((status = 204)))]
pub async fn cancel_sync(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    state.sync_service.cancel();
    state.sync_retry_attempts.store(0, Ordering::Release);
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/v1/sync/run", responses((status = 200, body = SyncRun)))]
pub async fn run_sync(State(state): State<Arc<AppState>>) -> ApiResult<Json<SyncRun>> {
    let (outcome, next) = run_sync_job(&state).await;
    Ok(Json(SyncRun::new(&outcome, next)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bootstrap",
    request_body = BootstrapRequest,
    responses((status = 200, body = ScheduledJob, description = "Armed job, null when the event is ignored"))
)]
pub async fn bootstrap(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<Json<Option<ScheduledJob>>> {
    let event = BootstrapEvent::from_action(&payload.action);
    let job = state.bootstrap.on_event(&event, Utc::now());
    Ok(Json(job.map(ScheduledJob::from)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sync/schedule", post(schedule_sync).delete(cancel_sync))
        .route("/sync/run", post(run_sync))
        .route("/bootstrap", post(bootstrap))
}
