//! Seams between the sync policy and the host platform.

use async_trait::async_trait;

use crate::errors::Result;
use crate::sync::SyncJobSpec;

/// Deferred-job facility of the host.
pub trait JobScheduler: Send + Sync {
    /// Arm the job, replacing any pending job with the same id.
    fn schedule(&self, spec: &SyncJobSpec) -> Result<()>;

    /// Drop a pending job. Unknown ids are ignored.
    fn cancel(&self, job_id: u32);
}

/// Device measurements the sync guard needs.
pub trait DeviceProbe: Send + Sync {
    /// Battery charge in percent, `None` without a battery.
    fn battery_percent(&self) -> Option<u8>;

    /// Free bytes on the volume holding the wallet data.
    fn free_storage_bytes(&self) -> Result<u64>;

    fn is_network_metered(&self) -> bool;

    /// Size of the local blockchain file, zero when absent.
    fn blockchain_file_bytes(&self) -> u64;
}

/// The blockchain synchronization service, which lives outside this crate.
#[async_trait]
pub trait BlockchainSync: Send + Sync {
    async fn start(&self) -> Result<()>;
}
