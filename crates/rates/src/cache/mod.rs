//! In-memory exchange rate cache with one durable fallback entry.

mod fallback;
mod outcome;
mod service;

pub use fallback::{FallbackStore, MemoryFallbackStore};
pub use outcome::RefreshOutcome;
pub use service::{
    RateCacheConfig, RateCacheService, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_REFRESH_INTERVAL_SECS,
};
