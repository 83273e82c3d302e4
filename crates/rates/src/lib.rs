//! Goldwallet Rates Crate
//!
//! Fetches fiat exchange rates of the wallet coin from an upstream price API
//! and keeps the latest set in memory, plus one persisted fallback rate.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +--------------------+     +------------------+
//! |  RateProvider    | --> |  RateCacheService  | --> |  RateRow query   |
//! |  (CoinGecko)     |     |  snapshot + clock  |     |  results         |
//! +------------------+     +--------------------+     +------------------+
//!                                   |
//!                                   v
//!                          +------------------+
//!                          |  FallbackStore   |  (one durable rate)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`ExchangeRate`] - Coin-to-fiat rate in fixed-point units
//! - [`RateSnapshot`] - Immutable, code-ordered set of rates from one refresh
//! - [`RateCacheService`] - Owns the snapshot and answers queries
//! - [`RefreshOutcome`] - What a refresh attempt did
//! - [`RateProvider`] - Upstream price API abstraction

pub mod cache;
pub mod errors;
pub mod models;
pub mod provider;

pub use cache::{
    FallbackStore, MemoryFallbackStore, RateCacheConfig, RateCacheService, RefreshOutcome,
};
pub use errors::RateError;
pub use models::{
    currency_for_locale, currency_symbol, CoinDenominations, ExchangeRate, Freshness, Rate,
    RateFilter, RateRow, RateSnapshot, COIN, DEFAULT_CURRENCY_CODE,
};
pub use provider::coingecko::{CoinGeckoConfig, CoinGeckoProvider, COINGECKO_SOURCE};
pub use provider::RateProvider;
