use std::sync::atomic::AtomicU32;
use std::sync::Arc;

use crate::config::{Config, LogFormat};
use crate::platform::{HostDeviceProbe, TokioJobScheduler, WebhookBlockchainSync};
use goldwallet_core::{
    bootstrap::BootstrapHandler,
    power::PowerManager,
    settings::{Configuration, FileSettingsStore, SettingsStore},
    sync::{BlockchainSync, DeviceProbe, StartSyncService},
};
use goldwallet_rates::{
    CoinGeckoConfig, CoinGeckoProvider, FallbackStore, RateCacheConfig, RateCacheService,
    RateProvider,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub rate_cache: Arc<RateCacheService>,
    pub configuration: Configuration,
    pub sync_service: Arc<StartSyncService>,
    pub bootstrap: BootstrapHandler,
    pub job_scheduler: Arc<TokioJobScheduler>,
    /// Unsuccessful sync runs since the last start
    pub sync_retry_attempts: AtomicU32,
}

/// Outside systems the services talk to. Tests swap these for stubs.
pub struct Collaborators {
    pub rate_provider: Arc<dyn RateProvider>,
    pub blockchain: Arc<dyn BlockchainSync>,
    pub device_probe: Arc<dyn DeviceProbe>,
    pub power_manager: Arc<dyn PowerManager>,
}

impl Collaborators {
    pub fn from_config(config: &Config) -> Self {
        let provider = CoinGeckoProvider::new(CoinGeckoConfig {
            base_url: config.coingecko_url.clone(),
            coin_id: config.coin_id.clone(),
            timeout: config.fetch_timeout(),
            ..CoinGeckoConfig::default()
        });
        let probe = Arc::new(HostDeviceProbe::new(
            config.sysfs_root.clone(),
            config.data_dir.clone(),
            config.blockchain_file.clone(),
            config.network_metered,
        ));

        Self {
            rate_provider: Arc::new(provider),
            blockchain: Arc::new(WebhookBlockchainSync::new(
                config.sync_trigger_url.clone(),
                config.request_timeout,
            )),
            device_probe: probe.clone(),
            power_manager: probe,
        }
    }
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with(config, Collaborators::from_config(config)).await
}

pub async fn build_state_with(
    config: &Config,
    collaborators: Collaborators,
) -> anyhow::Result<Arc<AppState>> {
    std::fs::create_dir_all(&config.data_dir)?;
    tracing::info!("Data directory in use: {}", config.data_dir.display());

    let file_store = FileSettingsStore::new(config.settings_file.clone());
    match file_store.discard_malformed() {
        Ok(Some(backup)) => tracing::warn!(
            "Settings file was malformed, moved it to {} and starting with defaults",
            backup.display()
        ),
        Ok(None) => {}
        Err(e) => tracing::warn!("Settings file could not be checked: {}", e),
    }
    let settings_store: Arc<dyn SettingsStore> = Arc::new(file_store);
    let configuration = Configuration::new(settings_store);

    let fallback_store: Arc<dyn FallbackStore> = Arc::new(configuration.clone());
    let rate_cache = Arc::new(RateCacheService::start(
        collaborators.rate_provider,
        fallback_store,
        RateCacheConfig {
            locale_currency: config.locale_currency.clone(),
            fetch_timeout: config.fetch_timeout(),
            ..RateCacheConfig::default()
        },
    ));

    let job_scheduler = Arc::new(TokioJobScheduler::new());
    let sync_service = Arc::new(StartSyncService::new(
        configuration.clone(),
        job_scheduler.clone(),
        collaborators.device_probe,
        collaborators.power_manager,
        collaborators.blockchain,
    ));
    let bootstrap = BootstrapHandler::new(sync_service.clone());

    Ok(Arc::new(AppState {
        rate_cache,
        configuration,
        sync_service,
        bootstrap,
        job_scheduler,
        sync_retry_attempts: AtomicU32::new(0),
    }))
}
