//! Core error types for the wallet services.
//!
//! Storage and platform errors are carried in string form so callers only
//! depend on this crate's types.

use thiserror::Error;

use goldwallet_rates::RateError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the wallet services.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Settings store error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Job scheduler rejected the request: {0}")]
    Scheduler(String),

    #[error("Blockchain sync could not be started: {0}")]
    SyncStart(String),

    #[error("Device probe failed: {0}")]
    Device(String),

    #[error("Exchange rate error: {0}")]
    Rates(#[from] RateError),
}

/// Errors of the persisted settings document.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Read(String),

    #[error("Failed to write settings file: {0}")]
    Write(String),

    #[error("Settings file is malformed: {0}")]
    Malformed(String),

    #[error("Settings lock poisoned")]
    LockPoisoned,
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid currency code: '{0}'")]
    InvalidCurrencyCode(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Settings(SettingsError::Read(err.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Settings(SettingsError::Malformed(err.to_string()))
    }
}

impl From<Error> for RateError {
    fn from(err: Error) -> Self {
        match err {
            Error::Rates(inner) => inner,
            other => RateError::Store(other.to_string()),
        }
    }
}
