//! Device-condition guard evaluated right before a sync starts.

use chrono::TimeDelta;
use log::info;

use crate::constants::{
    LAST_USAGE_THRESHOLD_RECENTLY, METERED_AVOID_BLOCKCHAIN_BYTES, MIN_BATTERY_PERCENT,
    MIN_FREE_STORAGE_BYTES,
};
use crate::power::{is_power_save_active, PowerState};
use crate::sync::{DeclineReason, GuardDecision};

/// What the device looks like at the moment the job fires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceConditions {
    /// `None` when the host has no battery information
    pub battery_percent: Option<u8>,
    /// `None` when the host has no power manager
    pub power: Option<PowerState>,
    /// `None` when free storage could not be measured
    pub free_storage_bytes: Option<u64>,
    pub network_metered: bool,
    pub blockchain_file_bytes: u64,
    /// `None` when the wallet was never used
    pub last_used_ago: Option<TimeDelta>,
}

/// Thresholds of the start-sync guard.
#[derive(Debug, Clone)]
pub struct SyncGuard {
    pub min_battery_percent: u8,
    pub min_free_storage_bytes: u64,
    pub metered_avoid_blockchain_bytes: u64,
    pub recently_used_threshold: TimeDelta,
}

impl Default for SyncGuard {
    fn default() -> Self {
        Self {
            min_battery_percent: MIN_BATTERY_PERCENT,
            min_free_storage_bytes: MIN_FREE_STORAGE_BYTES,
            metered_avoid_blockchain_bytes: METERED_AVOID_BLOCKCHAIN_BYTES,
            recently_used_threshold: LAST_USAGE_THRESHOLD_RECENTLY,
        }
    }
}

impl SyncGuard {
    /// Checks battery, power saving, storage and network, in that order.
    /// The first failing check decides.
    pub fn evaluate(&self, conditions: &DeviceConditions) -> GuardDecision {
        if let Some(percent) = conditions.battery_percent {
            if percent < self.min_battery_percent {
                info!("Battery level too low for sync: {}%", percent);
                return GuardDecision::Decline(DeclineReason::LowBattery { percent });
            }
        }

        if is_power_save_active(conditions.power.as_ref()) {
            info!("Power save mode enabled, deferring sync");
            return GuardDecision::Decline(DeclineReason::PowerSave);
        }

        match conditions.free_storage_bytes {
            None => {
                info!("Free storage unknown, deferring sync");
                return GuardDecision::Decline(DeclineReason::StorageUnknown);
            }
            Some(available) if available < self.min_free_storage_bytes => {
                info!(
                    "Insufficient storage for sync: {} bytes available, {} required",
                    available, self.min_free_storage_bytes
                );
                return GuardDecision::Decline(DeclineReason::LowStorage {
                    available_bytes: available,
                });
            }
            Some(_) => {}
        }

        if conditions.network_metered && self.should_avoid_metered_sync(conditions) {
            info!("Avoiding sync on metered network to preserve user data");
            return GuardDecision::Decline(DeclineReason::MeteredNetwork);
        }

        GuardDecision::Proceed
    }

    /// A large pending download for a wallet nobody used lately is not worth
    /// metered data.
    fn should_avoid_metered_sync(&self, conditions: &DeviceConditions) -> bool {
        let not_used_recently = conditions
            .last_used_ago
            .map_or(true, |ago| ago > self.recently_used_threshold);
        conditions.blockchain_file_bytes > self.metered_avoid_blockchain_bytes && not_used_recently
    }
}
