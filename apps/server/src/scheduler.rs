//! Background worker that runs the blockchain sync job when it fires.
//!
//! The job scheduler only signals that a job is due. This worker runs the
//! job and arms the next one: the regular interval after a start, a backoff
//! retry after a decline or a failed start.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::Utc;
use goldwallet_core::constants::SYNC_JOB_ID;
use goldwallet_core::sync::{JobOutcome, ScheduledJob};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;

/// Starts the sync job worker. Does nothing when a worker already runs.
pub fn start_sync_job_worker(state: Arc<AppState>) {
    let Some(mut fired) = state.job_scheduler.take_fired() else {
        warn!("Sync job worker already started");
        return;
    };

    tokio::spawn(async move {
        info!("Sync job worker started");
        while let Some(job_id) = fired.recv().await {
            if job_id != SYNC_JOB_ID {
                debug!("Ignoring unknown job {}", job_id);
                continue;
            }
            run_sync_job(&state).await;
        }
        info!("Sync job worker stopped");
    });
}

/// Runs the sync job once and re-arms it.
pub async fn run_sync_job(state: &Arc<AppState>) -> (JobOutcome, ScheduledJob) {
    let outcome = state.sync_service.on_start_job(Utc::now()).await;

    let next = match &outcome {
        JobOutcome::Started => {
            state.sync_retry_attempts.store(0, Ordering::Release);
            state.sync_service.schedule(Utc::now())
        }
        JobOutcome::Rescheduled { reason } => {
            let attempt = state.sync_retry_attempts.fetch_add(1, Ordering::AcqRel) + 1;
            info!("Sync job rescheduled ({}), retry attempt {}", reason, attempt);
            state.sync_service.schedule_retry(Utc::now(), attempt)
        }
    };

    (outcome, next)
}
