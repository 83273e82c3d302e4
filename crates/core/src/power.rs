//! Power state of the host, as seen by the sync guard.

use serde::{Deserialize, Serialize};

/// Snapshot of the host power manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerState {
    /// System-wide battery saver is on
    pub power_save_mode: bool,
    /// Device is in a deep idle state
    pub device_idle: bool,
    /// This wallet is exempt from battery optimizations
    pub ignoring_battery_optimizations: bool,
}

/// Source of [`PowerState`]. `None` means no power manager is available.
pub trait PowerManager: Send + Sync {
    fn power_state(&self) -> Option<PowerState>;
}

/// Whether the device saves power in a way that should defer a sync.
///
/// Device idle only counts while the wallet is subject to battery
/// optimizations. Without a power manager this is `false`.
pub fn is_power_save_active(state: Option<&PowerState>) -> bool {
    match state {
        Some(state) => {
            state.power_save_mode || (!state.ignoring_battery_optimizations && state.device_idle)
        }
        None => false,
    }
}

/// Whether battery optimizations apply to the wallet.
///
/// Without a power manager this is `true`.
pub fn is_battery_optimization_active(state: Option<&PowerState>) -> bool {
    state.map_or(true, |state| !state.ignoring_battery_optimizations)
}

/// One-line summary for log output.
pub fn status_description(state: Option<&PowerState>) -> String {
    match state {
        Some(state) => format!(
            "PowerSave: {}, Doze: {}, BatteryOptWhitelisted: {}",
            state.power_save_mode, state.device_idle, state.ignoring_battery_optimizations
        ),
        None => "PowerManager unavailable".to_string(),
    }
}
