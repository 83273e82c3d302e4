//! Rate models
//!
//! - `units` - Fixed-point coin and fiat units (Rate, COIN)
//! - `exchange_rate` - ExchangeRate value object and the RateRow query record
//! - `snapshot` - Ordered, immutable set of rates from one refresh
//! - `coin` - The wallet coin's own denominations
//! - `currency` - Currency symbols and locale-to-currency lookups
//! - `query` - Query filter and freshness mode

mod coin;
pub mod currency;
mod exchange_rate;
mod query;
mod snapshot;
mod units;

pub use coin::CoinDenominations;
pub use currency::{currency_for_locale, currency_symbol, DEFAULT_CURRENCY_CODE};
pub use exchange_rate::{ExchangeRate, RateRow};
pub use query::{Freshness, RateFilter};
pub use snapshot::RateSnapshot;
pub use units::{fiat_from_price, parse_fiat_inexact, Rate, COIN, FIAT_SMALLEST_UNIT_EXPONENT};
