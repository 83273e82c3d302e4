use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info, warn};
use std::sync::Arc;

use crate::constants::SYNC_JOB_ID;
use crate::power::{status_description, PowerManager};
use crate::settings::Configuration;
use crate::sync::{
    BlockchainSync, DeviceConditions, DeviceProbe, GuardDecision, JobOutcome, JobScheduler,
    NetworkRequirement, RescheduleReason, ScheduledJob, SyncGuard, SyncJobSpec, UsageTier,
};

/// Schedules the "start blockchain sync" job and runs it when it fires.
pub struct StartSyncService {
    config: Configuration,
    scheduler: Arc<dyn JobScheduler>,
    probe: Arc<dyn DeviceProbe>,
    power: Arc<dyn PowerManager>,
    blockchain: Arc<dyn BlockchainSync>,
    guard: SyncGuard,
}

impl StartSyncService {
    pub fn new(
        config: Configuration,
        scheduler: Arc<dyn JobScheduler>,
        probe: Arc<dyn DeviceProbe>,
        power: Arc<dyn PowerManager>,
        blockchain: Arc<dyn BlockchainSync>,
    ) -> Self {
        Self {
            config,
            scheduler,
            probe,
            power,
            blockchain,
            guard: SyncGuard::default(),
        }
    }

    pub fn with_guard(mut self, guard: SyncGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Arm the sync job with the interval of the current usage tier.
    ///
    /// Never fails: an unreadable configuration counts as a dormant wallet
    /// and a rejection by the scheduler is only logged.
    pub fn schedule(&self, now: DateTime<Utc>) -> ScheduledJob {
        let tier = UsageTier::from_last_used_ago(self.last_used_ago(now));
        let spec = SyncJobSpec::for_tier(tier, self.probe.blockchain_file_bytes());
        self.submit(tier, spec)
    }

    /// Arm the sync job again after `attempt` unsuccessful runs.
    pub fn schedule_retry(&self, now: DateTime<Utc>, attempt: u32) -> ScheduledJob {
        let tier = UsageTier::from_last_used_ago(self.last_used_ago(now));
        let spec = SyncJobSpec::for_tier(tier, self.probe.blockchain_file_bytes()).retry(attempt);
        self.submit(tier, spec)
    }

    pub fn cancel(&self) {
        self.scheduler.cancel(SYNC_JOB_ID);
        info!("Cancelled blockchain sync job");
    }

    /// Gather the device conditions the guard decides on.
    pub fn device_conditions(&self, now: DateTime<Utc>) -> DeviceConditions {
        let free_storage_bytes = match self.probe.free_storage_bytes() {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Error checking storage: {}", e);
                None
            }
        };

        DeviceConditions {
            battery_percent: self.probe.battery_percent(),
            power: self.power.power_state(),
            free_storage_bytes,
            network_metered: self.probe.is_network_metered(),
            blockchain_file_bytes: self.probe.blockchain_file_bytes(),
            last_used_ago: self.last_used_ago(now),
        }
    }

    /// Run the job: check the device, then hand over to the blockchain
    /// service and record the attempt.
    pub async fn on_start_job(&self, now: DateTime<Utc>) -> JobOutcome {
        info!("Starting blockchain sync job with ID: {}", SYNC_JOB_ID);

        let conditions = self.device_conditions(now);
        debug!(
            "Power status: {}",
            status_description(conditions.power.as_ref())
        );

        if let GuardDecision::Decline(reason) = self.guard.evaluate(&conditions) {
            info!("System conditions not suitable for blockchain sync, rescheduling");
            return JobOutcome::Rescheduled {
                reason: RescheduleReason::Declined { reason },
            };
        }

        if let Err(e) = self.blockchain.start().await {
            warn!("Failed to start blockchain sync: {}", e);
            return JobOutcome::Rescheduled {
                reason: RescheduleReason::StartFailed {
                    message: e.to_string(),
                },
            };
        }

        if let Err(e) = self.config.update_last_sync_attempt(now) {
            warn!("Failed to record sync attempt: {}", e);
        }

        info!("Blockchain sync started successfully");
        JobOutcome::Started
    }

    /// The host stopped a running job. Returns whether to run it again.
    pub fn on_stop_job(&self) -> bool {
        info!("Blockchain sync job stopped: {}", SYNC_JOB_ID);
        false
    }

    fn submit(&self, tier: UsageTier, spec: SyncJobSpec) -> ScheduledJob {
        if spec.network == NetworkRequirement::Unmetered {
            info!(
                "Large blockchain file ({} bytes), requiring unmetered network",
                self.probe.blockchain_file_bytes()
            );
        }

        let accepted = match self.scheduler.schedule(&spec) {
            Ok(()) => {
                info!(
                    "Scheduled blockchain sync job with {}s interval",
                    spec.min_delay.num_seconds()
                );
                true
            }
            Err(e) => {
                warn!("Failed to schedule blockchain sync job: {}", e);
                false
            }
        };

        ScheduledJob {
            tier,
            spec,
            accepted,
        }
    }

    fn last_used_ago(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.config.last_used_ago(now).unwrap_or_else(|e| {
            warn!("Failed to read last usage, treating wallet as dormant: {}", e);
            None
        })
    }
}
