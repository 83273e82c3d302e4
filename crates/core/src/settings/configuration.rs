use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, warn};
use std::sync::Arc;

use goldwallet_rates::{ExchangeRate, FallbackStore, RateError};

use crate::errors::{Result, ValidationError};
use crate::settings::{SettingsStore, WalletSettings};

/// Typed access to the wallet settings.
///
/// Every accessor goes to the store, so several `Configuration` values over
/// the same store always agree.
#[derive(Clone)]
pub struct Configuration {
    store: Arc<dyn SettingsStore>,
}

impl Configuration {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    pub fn settings(&self) -> Result<WalletSettings> {
        self.store.load()
    }

    pub fn exchange_currency_code(&self) -> Result<Option<String>> {
        Ok(self.store.load()?.exchange_currency_code)
    }

    /// Set or clear the display currency. Codes are stored upper-case.
    pub fn set_exchange_currency_code(&self, code: Option<&str>) -> Result<Option<String>> {
        let normalized = code.map(normalize_currency_code).transpose()?;
        let written = self.store.update(&mut |settings: &mut WalletSettings| {
            settings.exchange_currency_code = normalized.clone();
        })?;
        debug!(
            "Exchange currency set to {:?}",
            written.exchange_currency_code
        );
        Ok(written.exchange_currency_code)
    }

    pub fn cached_exchange_rate(&self) -> Result<Option<ExchangeRate>> {
        Ok(self.store.load()?.cached_exchange_rate)
    }

    pub fn set_cached_exchange_rate(&self, rate: &ExchangeRate) -> Result<()> {
        self.store.update(&mut |settings: &mut WalletSettings| {
            settings.cached_exchange_rate = Some(rate.clone());
        })?;
        Ok(())
    }

    pub fn last_used_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.store.load()?.last_used_at)
    }

    /// Time since the wallet was last used, `None` if it never was.
    ///
    /// A timestamp in the future counts as just used.
    pub fn last_used_ago(&self, now: DateTime<Utc>) -> Result<Option<TimeDelta>> {
        Ok(self
            .last_used_at()?
            .map(|used| (now - used).max(TimeDelta::zero())))
    }

    pub fn touch_last_used(&self, now: DateTime<Utc>) -> Result<()> {
        self.store.update(&mut |settings: &mut WalletSettings| {
            settings.last_used_at = Some(now);
        })?;
        Ok(())
    }

    pub fn last_sync_attempt_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.store.load()?.last_sync_attempt_at)
    }

    pub fn update_last_sync_attempt(&self, now: DateTime<Utc>) -> Result<()> {
        self.store.update(&mut |settings: &mut WalletSettings| {
            settings.last_sync_attempt_at = Some(now);
        })?;
        Ok(())
    }
}

fn normalize_currency_code(code: &str) -> Result<String> {
    let trimmed = code.trim();
    let valid = (2..=8).contains(&trimmed.len())
        && trimmed.chars().all(|c| c.is_ascii_alphanumeric());
    if !valid {
        return Err(ValidationError::InvalidCurrencyCode(code.to_string()).into());
    }
    Ok(trimmed.to_ascii_uppercase())
}

impl FallbackStore for Configuration {
    fn preferred_currency_code(&self) -> Option<String> {
        match self.exchange_currency_code() {
            Ok(code) => code,
            Err(e) => {
                warn!("Failed to read exchange currency: {}", e);
                None
            }
        }
    }

    fn load_cached_rate(&self) -> std::result::Result<Option<ExchangeRate>, RateError> {
        Ok(self.cached_exchange_rate()?)
    }

    fn store_cached_rate(&self, rate: &ExchangeRate) -> std::result::Result<(), RateError> {
        Ok(self.set_cached_exchange_rate(rate)?)
    }
}
