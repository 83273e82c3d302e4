//! Re-arms the sync job when the host comes up or the wallet was upgraded.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::sync::{ScheduledJob, StartSyncService};

/// Lifecycle event delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapEvent {
    BootCompleted,
    PackageReplaced,
    Other(String),
}

impl BootstrapEvent {
    /// Map a host action name to an event.
    ///
    /// Accepts the short names (`boot_completed`) as well as the fully
    /// qualified intent actions (`android.intent.action.BOOT_COMPLETED`).
    /// Only an upgrade of this package counts; `PACKAGE_REPLACED` fires for
    /// every app on the device.
    pub fn from_action(action: &str) -> Self {
        let name = action.rsplit('.').next().unwrap_or(action);
        if name.eq_ignore_ascii_case("boot_completed") {
            BootstrapEvent::BootCompleted
        } else if name.eq_ignore_ascii_case("my_package_replaced") {
            BootstrapEvent::PackageReplaced
        } else {
            BootstrapEvent::Other(action.to_string())
        }
    }
}

/// Makes sure a sync job is always armed.
pub struct BootstrapHandler {
    sync: Arc<StartSyncService>,
}

impl BootstrapHandler {
    pub fn new(sync: Arc<StartSyncService>) -> Self {
        Self { sync }
    }

    /// Handle one event. Returns the armed job, or `None` when the event is
    /// not a boot or upgrade.
    pub fn on_event(&self, event: &BootstrapEvent, now: DateTime<Utc>) -> Option<ScheduledJob> {
        info!("got bootstrap event: {:?}", event);
        match event {
            BootstrapEvent::BootCompleted | BootstrapEvent::PackageReplaced => {
                Some(self.sync.schedule(now))
            }
            BootstrapEvent::Other(_) => None,
        }
    }
}
