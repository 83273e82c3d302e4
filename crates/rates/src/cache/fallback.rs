//! Durable home of the single fallback rate.

use std::sync::{Mutex, MutexGuard};

use crate::errors::RateError;
use crate::models::ExchangeRate;

/// Storage for the one rate that survives process restarts, plus the
/// user's preferred currency that decides which rate that is.
///
/// The wallet configuration implements this; tests use
/// [`MemoryFallbackStore`].
pub trait FallbackStore: Send + Sync {
    /// Currency the user selected for display, if any.
    fn preferred_currency_code(&self) -> Option<String>;

    /// The rate persisted after the last successful refresh.
    fn load_cached_rate(&self) -> Result<Option<ExchangeRate>, RateError>;

    /// Replace the persisted rate.
    fn store_cached_rate(&self, rate: &ExchangeRate) -> Result<(), RateError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    preferred: Option<String>,
    cached: Option<ExchangeRate>,
}

/// In-process [`FallbackStore`]. Nothing outlives the value itself.
#[derive(Debug, Default)]
pub struct MemoryFallbackStore {
    state: Mutex<MemoryState>,
}

impl MemoryFallbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferred(currency_code: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().preferred = Some(currency_code.into());
        store
    }

    pub fn with_cached(self, rate: ExchangeRate) -> Self {
        self.lock().cached = Some(rate);
        self
    }

    pub fn cached(&self) -> Option<ExchangeRate> {
        self.lock().cached.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FallbackStore for MemoryFallbackStore {
    fn preferred_currency_code(&self) -> Option<String> {
        self.lock().preferred.clone()
    }

    fn load_cached_rate(&self) -> Result<Option<ExchangeRate>, RateError> {
        Ok(self.lock().cached.clone())
    }

    fn store_cached_rate(&self, rate: &ExchangeRate) -> Result<(), RateError> {
        self.lock().cached = Some(rate.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryFallbackStore::with_preferred("EUR");
        assert_eq!(store.preferred_currency_code().as_deref(), Some("EUR"));
        assert!(store.load_cached_rate().unwrap().is_none());

        let rate = ExchangeRate::new("EUR", 10500, "test");
        store.store_cached_rate(&rate).unwrap();
        assert_eq!(store.load_cached_rate().unwrap(), Some(rate));
    }
}
