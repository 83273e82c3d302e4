#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, Response},
    Router,
};
use goldwallet_core::errors::{Error as CoreError, Result as CoreResult};
use goldwallet_core::power::{PowerManager, PowerState};
use goldwallet_core::sync::{BlockchainSync, DeviceProbe};
use goldwallet_rates::{ExchangeRate, RateError, RateProvider, RateSnapshot};
use goldwallet_server::{
    api::app_router, build_state_with, config::Config, config::LogFormat, AppState, Collaborators,
};
use tower::ServiceExt;

pub const SOURCE: &str = "CoinGecko.com";

pub fn test_config(dir: &Path) -> Config {
    Config {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        data_dir: dir.to_path_buf(),
        settings_file: dir.join("settings.json"),
        blockchain_file: dir.join("blockchain.spvchain"),
        coingecko_url: "http://127.0.0.1:9".to_string(),
        coin_id: "goldcoin".to_string(),
        locale_currency: None,
        network_metered: false,
        sync_trigger_url: None,
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(5),
        sysfs_root: dir.join("sys"),
        log_format: LogFormat::Text,
    }
}

/// Provider answering with a fixed set of rates, or failing or hanging on
/// demand.
pub struct FixedProvider {
    rates: Vec<ExchangeRate>,
    pub fail: AtomicBool,
    pub hang: AtomicBool,
    pub calls: AtomicUsize,
}

impl FixedProvider {
    pub fn new(rates: &[(&str, i64)]) -> Self {
        Self {
            rates: rates
                .iter()
                .map(|(code, fiat)| ExchangeRate::new(*code, *fiat, SOURCE))
                .collect(),
            fail: AtomicBool::new(false),
            hang: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateProvider for FixedProvider {
    fn id(&self) -> &'static str {
        "FIXED"
    }

    fn source(&self) -> &str {
        SOURCE
    }

    async fn fetch_rates(&self) -> Result<RateSnapshot, RateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(RateError::HttpStatus {
                provider: "FIXED".to_string(),
                status: 503,
            });
        }
        Ok(RateSnapshot::from_rates(self.rates.clone()))
    }
}

/// Device with fixed measurements.
pub struct StubDevice {
    pub battery_percent: Option<u8>,
    pub free_storage_bytes: u64,
    pub power_save: bool,
}

impl StubDevice {
    pub fn healthy() -> Self {
        Self {
            battery_percent: Some(80),
            free_storage_bytes: 10 * 1024 * 1024 * 1024,
            power_save: false,
        }
    }

    pub fn low_battery() -> Self {
        Self {
            battery_percent: Some(5),
            ..Self::healthy()
        }
    }
}

impl DeviceProbe for StubDevice {
    fn battery_percent(&self) -> Option<u8> {
        self.battery_percent
    }

    fn free_storage_bytes(&self) -> CoreResult<u64> {
        Ok(self.free_storage_bytes)
    }

    fn is_network_metered(&self) -> bool {
        false
    }

    fn blockchain_file_bytes(&self) -> u64 {
        0
    }
}

impl PowerManager for StubDevice {
    fn power_state(&self) -> Option<PowerState> {
        Some(PowerState {
            power_save_mode: self.power_save,
            ..PowerState::default()
        })
    }
}

#[derive(Default)]
pub struct CountingBlockchain {
    pub starts: AtomicUsize,
    pub fail: AtomicBool,
}

impl CountingBlockchain {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlockchainSync for CountingBlockchain {
    async fn start(&self) -> CoreResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::SyncStart("chain service offline".to_string()));
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub provider: Arc<FixedProvider>,
    pub blockchain: Arc<CountingBlockchain>,
}

pub async fn build_app(config: &Config, provider: FixedProvider, device: StubDevice) -> TestApp {
    let provider = Arc::new(provider);
    let blockchain = Arc::new(CountingBlockchain::default());
    let device = Arc::new(device);
    let collaborators = Collaborators {
        rate_provider: provider.clone(),
        blockchain: blockchain.clone(),
        device_probe: device.clone(),
        power_manager: device,
    };
    let state = build_state_with(config, collaborators).await.unwrap();
    TestApp {
        router: app_router(state.clone(), config),
        state,
        provider,
        blockchain,
    }
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
