//! Error types for the rates crate.
//!
//! Every failure of an upstream fetch is a [`RateError`]. The cache service
//! never hands these to its callers; they are logged and the last good
//! snapshot is kept.

use thiserror::Error;

/// Errors that can occur while fetching or persisting exchange rates.
#[derive(Error, Debug)]
pub enum RateError {
    /// The provider answered with a non-2xx status.
    #[error("HTTP status {status} from {provider}")]
    HttpStatus {
        /// The provider that answered
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The response body did not have the shape the provider expects.
    #[error("Unexpected response from {provider}: {message}")]
    UnexpectedShape {
        /// The provider that answered
        provider: String,
        /// What was wrong with the document
        message: String,
    },

    /// A single rate value could not be converted to a fiat amount.
    #[error("Invalid rate for {currency}: {value}")]
    InvalidRate {
        /// Currency code of the entry
        currency: String,
        /// The raw value as received
        value: String,
    },

    /// The provider did not answer within the refresh deadline.
    #[error("{provider} did not answer within {seconds}s")]
    Timeout {
        /// The provider that was asked
        provider: String,
        /// The deadline that elapsed
        seconds: u64,
    },

    /// The fallback store failed to read or write the cached rate.
    #[error("Fallback store error: {0}")]
    Store(String),

    /// A network error occurred while talking to a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl RateError {
    /// Whether retrying later has a reasonable chance of succeeding.
    ///
    /// Server-side statuses, rate limiting and transport failures are
    /// transient. A malformed document or a client error is not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Self::Network(_) | Self::Timeout { .. } => true,
            Self::UnexpectedShape { .. } | Self::InvalidRate { .. } | Self::Store(_) => false,
        }
    }
}
