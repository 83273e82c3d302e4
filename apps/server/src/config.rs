use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use goldwallet_rates::currency_for_locale;
use goldwallet_rates::provider::coingecko::{DEFAULT_BASE_URL, DEFAULT_COIN_ID};

/// Output format of the tracing subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub settings_file: PathBuf,
    pub blockchain_file: PathBuf,
    pub coingecko_url: String,
    pub coin_id: String,
    /// Second step of the exchange-currency fallback chain
    pub locale_currency: Option<String>,
    pub network_metered: bool,
    /// Endpoint notified when a blockchain sync should start
    pub sync_trigger_url: Option<String>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Root of the sysfs tree the device probe reads
    pub sysfs_root: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = env_or("GW_LISTEN_ADDR", "127.0.0.1:8088")
            .parse()
            .context("Invalid GW_LISTEN_ADDR")?;
        let data_dir = PathBuf::from(env_or("GW_DATA_DIR", "./data"));
        let settings_file = env_path("GW_SETTINGS_FILE")
            .unwrap_or_else(|| data_dir.join("settings.json"));
        let blockchain_file = env_path("GW_BLOCKCHAIN_FILE")
            .unwrap_or_else(|| data_dir.join("blockchain.spvchain"));
        let cors_allow = env_or("GW_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("GW_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .unwrap_or(30000);
        let log_format = match env_or("GW_LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            settings_file,
            blockchain_file,
            data_dir,
            coingecko_url: env_or("GW_COINGECKO_URL", DEFAULT_BASE_URL),
            coin_id: env_or("GW_COIN_ID", DEFAULT_COIN_ID),
            locale_currency: locale_currency(),
            network_metered: parse_flag(&env_or("GW_NETWORK_METERED", "false")),
            sync_trigger_url: std::env::var("GW_SYNC_TRIGGER_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            sysfs_root: PathBuf::from(env_or("GW_SYSFS_ROOT", "/sys")),
            log_format,
        })
    }

    /// Deadline of one upstream rate fetch. Half the request deadline, so a
    /// hung upstream still leaves a live query time to answer from cache.
    pub fn fetch_timeout(&self) -> Duration {
        self.request_timeout / 2
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// `GW_DEFAULT_CURRENCY`, or the currency of the first locale variable that
/// names a known region.
fn locale_currency() -> Option<String> {
    if let Some(code) = std::env::var("GW_DEFAULT_CURRENCY")
        .ok()
        .map(|code| code.trim().to_ascii_uppercase())
        .filter(|code| !code.is_empty())
    {
        return Some(code);
    }

    ["LC_ALL", "LC_MONETARY", "LANG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find_map(|tag| currency_for_locale(&tag))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_fetch_timeout_is_inside_request_timeout() {
        let config = Config {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            data_dir: PathBuf::from("data"),
            settings_file: PathBuf::from("data/settings.json"),
            blockchain_file: PathBuf::from("data/blockchain.spvchain"),
            coingecko_url: DEFAULT_BASE_URL.to_string(),
            coin_id: DEFAULT_COIN_ID.to_string(),
            locale_currency: None,
            network_metered: false,
            sync_trigger_url: None,
            cors_allow: vec![],
            request_timeout: Duration::from_secs(30),
            sysfs_root: PathBuf::from("/sys"),
            log_format: LogFormat::Text,
        };
        assert_eq!(config.fetch_timeout(), Duration::from_secs(15));
    }
}
