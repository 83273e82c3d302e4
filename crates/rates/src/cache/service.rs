use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::Mutex;

use super::fallback::FallbackStore;
use super::outcome::RefreshOutcome;
use crate::errors::RateError;
use crate::models::{
    ExchangeRate, Freshness, RateFilter, RateRow, RateSnapshot, DEFAULT_CURRENCY_CODE,
};
use crate::provider::RateProvider;

/// Age after which a cached snapshot no longer answers live queries.
pub const DEFAULT_REFRESH_INTERVAL_SECS: i64 = 10 * 60;

/// Longest a single upstream fetch may take before it counts as failed.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug)]
pub struct RateCacheConfig {
    /// Snapshots this old or older are stale
    pub refresh_interval: TimeDelta,
    /// Deadline of one upstream fetch. Keep it below any deadline of the
    /// callers so a hung provider degrades to the cached snapshot.
    pub fetch_timeout: Duration,
    /// Currency of the system locale, second step of the fallback chain
    pub locale_currency: Option<String>,
    /// Last step of the fallback chain
    pub default_currency: String,
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval: TimeDelta::seconds(DEFAULT_REFRESH_INTERVAL_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            locale_currency: None,
            default_currency: DEFAULT_CURRENCY_CODE.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    snapshot: Option<Arc<RateSnapshot>>,
    last_updated_at: Option<DateTime<Utc>>,
}

/// Owns the latest rate snapshot and answers rate queries from it.
///
/// Live queries refresh a stale snapshot first. Refreshes are serialized:
/// callers arriving while a fetch is in flight wait for it and reuse its
/// result instead of fetching again.
pub struct RateCacheService {
    provider: Arc<dyn RateProvider>,
    store: Arc<dyn FallbackStore>,
    config: RateCacheConfig,
    state: RwLock<CacheState>,
    refresh_lock: Mutex<()>,
    attempts: AtomicU64,
}

impl RateCacheService {
    /// Create the service, seeding the cache from the persisted fallback.
    ///
    /// With a persisted rate the cache starts with exactly that one entry,
    /// so a rate is available before any network access. The seed does not
    /// count as fresh; the first live query still refreshes.
    pub fn start(
        provider: Arc<dyn RateProvider>,
        store: Arc<dyn FallbackStore>,
        config: RateCacheConfig,
    ) -> Self {
        let mut state = CacheState::default();

        match store.load_cached_rate() {
            Ok(Some(rate)) => {
                debug!("Seeding rate cache with persisted {} rate", rate.currency_code);
                state.snapshot = Some(Arc::new(RateSnapshot::single(rate)));
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to load persisted exchange rate: {}", e),
        }

        Self {
            provider,
            store,
            config,
            state: RwLock::new(state),
            refresh_lock: Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &RateCacheConfig {
        &self.config
    }

    /// The current snapshot, if any rates were ever loaded.
    pub fn snapshot(&self) -> Option<Arc<RateSnapshot>> {
        self.read_state().snapshot.clone()
    }

    /// Time of the last successful refresh.
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.read_state().last_updated_at
    }

    /// Answer a rate query at the current time.
    pub async fn query(&self, filter: &RateFilter, freshness: Freshness) -> Vec<RateRow> {
        self.query_at(filter, freshness, Utc::now()).await
    }

    /// Answer a rate query as of `now`.
    ///
    /// Never fails: a failed refresh leaves the cached snapshot in place and
    /// the query is answered from it.
    pub async fn query_at(
        &self,
        filter: &RateFilter,
        freshness: Freshness,
        now: DateTime<Utc>,
    ) -> Vec<RateRow> {
        if freshness == Freshness::Live {
            match self.refresh_if_stale(now).await {
                RefreshOutcome::Refreshed(snapshot) => {
                    info!("Exchange rates refreshed: {} currencies", snapshot.len());
                }
                RefreshOutcome::Unchanged => {}
                RefreshOutcome::Failed(reason) => {
                    warn!("Exchange rate refresh failed, using cache: {}", reason);
                }
            }
        }

        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };

        match filter {
            RateFilter::All => snapshot.iter().map(RateRow::from).collect(),
            RateFilter::Search(text) => {
                let needle = text.to_lowercase();
                snapshot
                    .iter()
                    .filter(|rate| RateFilter::search_matches(&needle, rate))
                    .map(RateRow::from)
                    .collect()
            }
            RateFilter::Code(code) => self
                .best_rate_in(&snapshot, Some(code.as_str()))
                .map(RateRow::from)
                .into_iter()
                .collect(),
        }
    }

    /// Resolve a currency through the fallback chain:
    /// requested code, then the locale currency, then the default currency.
    /// Codes are matched case-insensitively.
    pub fn best_rate(&self, currency_code: Option<&str>) -> Option<ExchangeRate> {
        let snapshot = self.snapshot()?;
        self.best_rate_in(&snapshot, currency_code).cloned()
    }

    fn best_rate_in<'a>(
        &self,
        snapshot: &'a RateSnapshot,
        currency_code: Option<&str>,
    ) -> Option<&'a ExchangeRate> {
        let requested = currency_code.map(|code| code.trim().to_ascii_uppercase());
        requested
            .as_deref()
            .and_then(|code| snapshot.get(code))
            .or_else(|| {
                self.config
                    .locale_currency
                    .as_deref()
                    .and_then(|code| snapshot.get(code))
            })
            .or_else(|| snapshot.get(&self.config.default_currency))
    }

    /// Whether a live query at `now` has to refresh first.
    ///
    /// The boundary is inclusive: a snapshot exactly one interval old is stale.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.read_state().last_updated_at {
            None => true,
            Some(updated) => now - updated >= self.config.refresh_interval,
        }
    }

    /// Refresh when the snapshot is stale at `now`.
    pub async fn refresh_if_stale(&self, now: DateTime<Utc>) -> RefreshOutcome {
        if !self.is_stale(now) {
            return RefreshOutcome::Unchanged;
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let _guard = self.refresh_lock.lock().await;

        // Another caller fetched while we were waiting for the lock.
        if self.attempts.load(Ordering::Acquire) != seen || !self.is_stale(now) {
            return RefreshOutcome::Unchanged;
        }

        self.fetch_and_apply(now).await
    }

    /// Refresh unconditionally, still one fetch at a time.
    pub async fn refresh(&self) -> RefreshOutcome {
        let _guard = self.refresh_lock.lock().await;
        self.fetch_and_apply(Utc::now()).await
    }

    async fn fetch_and_apply(&self, now: DateTime<Utc>) -> RefreshOutcome {
        let deadline = self.config.fetch_timeout;
        let result = match tokio::time::timeout(deadline, self.provider.fetch_rates()).await {
            Ok(result) => result,
            Err(_) => Err(RateError::Timeout {
                provider: self.provider.id().to_string(),
                seconds: deadline.as_secs(),
            }),
        };
        self.attempts.fetch_add(1, Ordering::AcqRel);

        let snapshot = match result {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                if e.is_transient() {
                    warn!(
                        "problem fetching exchange rates from {}: {}",
                        self.provider.id(),
                        e
                    );
                } else {
                    error!(
                        "{} returned unusable exchange rates: {}",
                        self.provider.id(),
                        e
                    );
                }
                return RefreshOutcome::Failed(e.to_string());
            }
        };

        {
            let mut state = self.write_state();
            state.snapshot = Some(snapshot.clone());
            state.last_updated_at = Some(now);
        }

        self.persist_fallback(&snapshot);
        RefreshOutcome::Refreshed(snapshot)
    }

    fn persist_fallback(&self, snapshot: &RateSnapshot) {
        let preferred = self.store.preferred_currency_code();
        let Some(rate) = self.best_rate_in(snapshot, preferred.as_deref()) else {
            debug!("No rate to persist for {:?}", preferred);
            return;
        };

        if let Err(e) = self.store.store_cached_rate(rate) {
            warn!(
                "Failed to persist {} exchange rate: {}",
                rate.currency_code, e
            );
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(|poisoned| {
            warn!("Rate cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!("Rate cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
