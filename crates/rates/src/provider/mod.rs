//! Upstream rate providers.
//!
//! This module contains:
//! - The `RateProvider` trait every price API implements
//! - The CoinGecko implementation, the only live price source

mod traits;

pub mod coingecko;

pub use traits::RateProvider;
