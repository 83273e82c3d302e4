//! Blockchain sync scheduling - usage tiers, job spec, device guard and the
//! start-sync service.

mod sync_guard;
mod sync_model;
mod sync_service;
mod sync_traits;

pub use sync_guard::{DeviceConditions, SyncGuard};
pub use sync_model::{
    DeclineReason, GuardDecision, JobOutcome, NetworkRequirement, RescheduleReason, ScheduledJob,
    SyncJobSpec, UsageTier,
};
pub use sync_service::StartSyncService;
pub use sync_traits::{BlockchainSync, DeviceProbe, JobScheduler};
