use serde::{Deserialize, Serialize};

use super::currency::currency_symbol;
use super::exchange_rate::ExchangeRate;

/// Which rates a query selects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum RateFilter {
    /// Every rate in the snapshot
    All,
    /// Case-insensitive substring of the code or the currency symbol
    Search(String),
    /// One currency, resolved through the default-currency fallback chain
    Code(String),
}

impl RateFilter {
    /// Whether a rate matches a text search needle.
    ///
    /// The needle is expected in lower case.
    pub(crate) fn search_matches(needle: &str, rate: &ExchangeRate) -> bool {
        let code = rate.currency_code.to_lowercase();
        let symbol = currency_symbol(&rate.currency_code).to_lowercase();
        code.contains(needle) || symbol.contains(needle)
    }
}

/// Whether a query may trigger an upstream fetch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Answer from the cache only
    Offline,
    /// Refresh first when the cache is stale
    #[default]
    Live,
}
