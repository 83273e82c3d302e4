use serde::{Deserialize, Serialize};

use super::units::Rate;

/// Exchange rate of the wallet coin against one fiat currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    /// Fiat currency code (e.g., "USD")
    pub currency_code: String,

    /// Coin-to-fiat ratio in fixed-point units
    pub rate: Rate,

    /// Upstream provider label (e.g., "CoinGecko.com")
    pub source: String,
}

impl ExchangeRate {
    /// Create a rate quoted against one whole coin.
    pub fn new(currency_code: impl Into<String>, fiat: i64, source: impl Into<String>) -> Self {
        Self {
            currency_code: currency_code.into(),
            rate: Rate::per_coin(fiat),
            source: source.into(),
        }
    }
}

/// Read-only record handed out by rate queries.
///
/// Mirrors the columns of the query interface:
/// `(code, rate_coin, rate_fiat, source)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRow {
    pub currency_code: String,
    pub rate_coin: i64,
    pub rate_fiat: i64,
    pub source: String,
}

impl From<&ExchangeRate> for RateRow {
    fn from(rate: &ExchangeRate) -> Self {
        Self {
            currency_code: rate.currency_code.clone(),
            rate_coin: rate.rate.coin,
            rate_fiat: rate.rate.fiat,
            source: rate.source.clone(),
        }
    }
}

impl From<RateRow> for ExchangeRate {
    fn from(row: RateRow) -> Self {
        Self {
            currency_code: row.currency_code,
            rate: Rate {
                coin: row.rate_coin,
                fiat: row.rate_fiat,
            },
            source: row.source,
        }
    }
}
