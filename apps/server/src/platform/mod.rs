//! Host implementations of the collaborator traits the sync service needs.

mod blockchain;
mod device;
mod job_scheduler;

pub use blockchain::WebhookBlockchainSync;
pub use device::HostDeviceProbe;
pub use job_scheduler::TokioJobScheduler;
