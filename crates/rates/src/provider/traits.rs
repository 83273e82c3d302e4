//! Rate provider trait definition.

use async_trait::async_trait;

use crate::errors::RateError;
use crate::models::RateSnapshot;

/// Trait for upstream price APIs.
///
/// A provider either returns a complete snapshot or an error. It never
/// returns a partially parsed document.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use goldwallet_rates::{RateError, RateProvider, RateSnapshot};
///
/// struct FixedProvider(RateSnapshot);
///
/// #[async_trait]
/// impl RateProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     fn source(&self) -> &str {
///         "fixed"
///     }
///
///     async fn fetch_rates(&self) -> Result<RateSnapshot, RateError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Constant identifier used in logs and errors (e.g., "COINGECKO").
    fn id(&self) -> &'static str;

    /// Label stored in the `source` field of every rate this provider returns.
    fn source(&self) -> &str;

    /// Fetch the current fiat rates of the wallet coin.
    async fn fetch_rates(&self) -> Result<RateSnapshot, RateError>;
}
