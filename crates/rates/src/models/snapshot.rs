use std::collections::BTreeMap;

use super::exchange_rate::ExchangeRate;

/// Full set of exchange rates produced by one refresh, ordered by code.
///
/// A snapshot is built once and then only read. Later refreshes replace it
/// as a whole.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RateSnapshot {
    rates: BTreeMap<String, ExchangeRate>,
}

impl RateSnapshot {
    /// Build a snapshot from rates. A later entry for the same code wins.
    pub fn from_rates(rates: impl IntoIterator<Item = ExchangeRate>) -> Self {
        let rates = rates
            .into_iter()
            .map(|rate| (rate.currency_code.clone(), rate))
            .collect();
        Self { rates }
    }

    /// Snapshot holding exactly one rate.
    pub fn single(rate: ExchangeRate) -> Self {
        Self::from_rates([rate])
    }

    pub fn get(&self, currency_code: &str) -> Option<&ExchangeRate> {
        self.rates.get(currency_code)
    }

    /// Rates in currency code order.
    pub fn iter(&self) -> impl Iterator<Item = &ExchangeRate> {
        self.rates.values()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
