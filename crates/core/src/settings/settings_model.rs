//! Settings domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use goldwallet_rates::ExchangeRate;

use crate::constants::SETTINGS_VERSION;

/// The persisted wallet settings document.
///
/// Every field is optional in the file; absent fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletSettings {
    pub version: u32,
    /// Fiat currency the user picked for display
    pub exchange_currency_code: Option<String>,
    /// Rate kept from the last successful refresh
    pub cached_exchange_rate: Option<ExchangeRate>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub last_sync_attempt_at: Option<DateTime<Utc>>,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            exchange_currency_code: None,
            cached_exchange_rate: None,
            last_used_at: None,
            last_sync_attempt_at: None,
        }
    }
}
