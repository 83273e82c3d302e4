//! CoinGecko provider for fiat exchange rates of the wallet coin.
//!
//! Fetches the coin document from the CoinGecko v3 API and reads
//! `market_data.current_price`, which maps lower-case currency codes to the
//! price of one coin in that currency.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::errors::RateError;
use crate::models::{fiat_from_price, CoinDenominations, ExchangeRate, RateSnapshot};
use crate::provider::RateProvider;

/// Provider ID constant
const PROVIDER_ID: &str = "COINGECKO";

/// Source label stored on every rate
pub const COINGECKO_SOURCE: &str = "CoinGecko.com";

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

pub const DEFAULT_COIN_ID: &str = "goldcoin";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Only the price table is needed; everything else in the document is skipped.
const COIN_QUERY: &[(&str, &str)] = &[
    ("localization", "false"),
    ("community_data", "false"),
    ("developer_data", "false"),
    ("sparkline", "false"),
];

#[derive(Debug, Deserialize)]
struct CoinResponse {
    id: String,
    market_data: MarketData,
}

#[derive(Debug, Deserialize)]
struct MarketData {
    current_price: BTreeMap<String, serde_json::Value>,
}

/// Settings for [`CoinGeckoProvider`].
#[derive(Clone, Debug)]
pub struct CoinGeckoConfig {
    /// API root without trailing slash
    pub base_url: String,
    /// CoinGecko coin id (e.g., "goldcoin")
    pub coin_id: String,
    /// Value of the User-Agent header
    pub user_agent: String,
    /// Codes excluded from the snapshot
    pub denominations: CoinDenominations,
    pub timeout: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            coin_id: DEFAULT_COIN_ID.to_string(),
            user_agent: concat!("goldwallet/", env!("CARGO_PKG_VERSION")).to_string(),
            denominations: CoinDenominations::default(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// CoinGecko price API provider.
///
/// # Example
///
/// ```ignore
/// use goldwallet_rates::provider::coingecko::{CoinGeckoConfig, CoinGeckoProvider};
///
/// let provider = CoinGeckoProvider::new(CoinGeckoConfig::default());
/// let snapshot = provider.fetch_rates().await?;
/// ```
pub struct CoinGeckoProvider {
    client: Client,
    config: CoinGeckoConfig,
}

impl CoinGeckoProvider {
    pub fn new(config: CoinGeckoConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    fn coin_url(&self) -> String {
        format!(
            "{}/coins/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.coin_id
        )
    }

    fn shape_error(message: impl Into<String>) -> RateError {
        RateError::UnexpectedShape {
            provider: PROVIDER_ID.to_string(),
            message: message.into(),
        }
    }

    /// Turns a coin document into a snapshot.
    ///
    /// The document as a whole must match; single entries that cannot be
    /// converted are skipped.
    fn parse_rates(&self, body: &str) -> Result<RateSnapshot, RateError> {
        let coin: CoinResponse =
            serde_json::from_str(body).map_err(|e| Self::shape_error(e.to_string()))?;

        if coin.id != self.config.coin_id {
            return Err(Self::shape_error(format!(
                "expected coin '{}', got '{}'",
                self.config.coin_id, coin.id
            )));
        }

        let mut rates = Vec::with_capacity(coin.market_data.current_price.len());
        for (key, value) in &coin.market_data.current_price {
            if self.config.denominations.contains(key) {
                continue;
            }
            let currency_code = key.to_uppercase();

            match Self::convert_price(&currency_code, value) {
                Ok(fiat) if fiat > 0 => {
                    rates.push(ExchangeRate::new(currency_code, fiat, COINGECKO_SOURCE));
                }
                Ok(fiat) => {
                    debug!("Skipping non-positive {} rate: {}", currency_code, fiat);
                }
                Err(e) => {
                    warn!(
                        "problem fetching {} exchange rate from {}: {}",
                        currency_code, PROVIDER_ID, e
                    );
                }
            }
        }

        Ok(RateSnapshot::from_rates(rates))
    }

    fn convert_price(currency_code: &str, value: &serde_json::Value) -> Result<i64, RateError> {
        let invalid = || RateError::InvalidRate {
            currency: currency_code.to_string(),
            value: value.to_string(),
        };

        let price = match value {
            serde_json::Value::Number(number) => number.as_f64(),
            serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(invalid)?;

        fiat_from_price(price).ok_or_else(invalid)
    }
}

#[async_trait]
impl RateProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn source(&self) -> &str {
        COINGECKO_SOURCE
    }

    async fn fetch_rates(&self) -> Result<RateSnapshot, RateError> {
        let started = Instant::now();
        let url = self.coin_url();

        let response = self.client.get(&url).query(COIN_QUERY).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "http status {} when fetching exchange rates from {}",
                status.as_u16(),
                url
            );
            return Err(RateError::HttpStatus {
                provider: PROVIDER_ID.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let snapshot = self.parse_rates(&body)?;

        info!(
            "fetched exchange rates from {}, {} chars, took {:?}",
            url,
            body.len(),
            started.elapsed()
        );

        Ok(snapshot)
    }
}
