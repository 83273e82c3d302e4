use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use goldwallet_core::errors::{Error as CoreError, Result as CoreResult};
use goldwallet_core::sync::{JobScheduler, SyncJobSpec};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// In-process job scheduler backed by deferred tokio tasks.
///
/// Each job id owns at most one pending task. When a task's delay elapses
/// the job id is sent to the fired channel, which the sync worker drains.
/// Only `min_delay` is honored. The network, battery and storage
/// constraints of a [`SyncJobSpec`] are checked by the guard when it runs.
pub struct TokioJobScheduler {
    jobs: Mutex<HashMap<u32, JoinHandle<()>>>,
    fired_tx: mpsc::UnboundedSender<u32>,
    fired_rx: Mutex<Option<mpsc::UnboundedReceiver<u32>>>,
}

impl TokioJobScheduler {
    pub fn new() -> Self {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        Self {
            jobs: Mutex::new(HashMap::new()),
            fired_tx,
            fired_rx: Mutex::new(Some(fired_rx)),
        }
    }

    /// Hand out the receiving end of the fired channel. Only the first call
    /// gets it.
    pub fn take_fired(&self) -> Option<mpsc::UnboundedReceiver<u32>> {
        self.fired_rx.lock().ok().and_then(|mut rx| rx.take())
    }

    /// Whether a job with this id is armed and has not fired yet.
    pub fn is_pending(&self, job_id: u32) -> bool {
        self.lock_jobs()
            .map(|jobs| jobs.get(&job_id).is_some_and(|task| !task.is_finished()))
            .unwrap_or(false)
    }

    fn lock_jobs(&self) -> CoreResult<MutexGuard<'_, HashMap<u32, JoinHandle<()>>>> {
        self.jobs
            .lock()
            .map_err(|_| CoreError::Scheduler("job table lock poisoned".to_string()))
    }
}

impl Default for TokioJobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl JobScheduler for TokioJobScheduler {
    fn schedule(&self, spec: &SyncJobSpec) -> CoreResult<()> {
        let runtime = Handle::try_current().map_err(|e| CoreError::Scheduler(e.to_string()))?;
        let delay = spec
            .min_delay
            .to_std()
            .map_err(|e| CoreError::Scheduler(format!("invalid delay: {}", e)))?;

        let job_id = spec.job_id;
        let fired = self.fired_tx.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Job {} is due", job_id);
            if fired.send(job_id).is_err() {
                warn!("Job {} fired but no worker is listening", job_id);
            }
        });

        if let Some(previous) = self.lock_jobs()?.insert(job_id, task) {
            previous.abort();
        }
        Ok(())
    }

    fn cancel(&self, job_id: u32) {
        match self.lock_jobs() {
            Ok(mut jobs) => {
                if let Some(task) = jobs.remove(&job_id) {
                    task.abort();
                }
            }
            Err(e) => warn!("Failed to cancel job {}: {}", job_id, e),
        }
    }
}
