//! Wallet configuration - persisted settings document and typed accessors.

mod configuration;
mod file_store;
mod settings_model;
mod settings_traits;

pub use configuration::Configuration;
pub use file_store::FileSettingsStore;
pub use settings_model::WalletSettings;
pub use settings_traits::SettingsStore;
