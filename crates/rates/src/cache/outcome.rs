use std::sync::Arc;

use crate::models::RateSnapshot;

/// Result of one refresh attempt.
///
/// Refresh failures never reach query callers. The outcome exists so the
/// caller can log what happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot replaced the cached one.
    Refreshed(Arc<RateSnapshot>),
    /// The cache was fresh, or another caller refreshed it while we waited.
    Unchanged,
    /// The fetch failed; the previous snapshot is still in place.
    Failed(String),
}

impl RefreshOutcome {
    pub fn is_refreshed(&self) -> bool {
        matches!(self, Self::Refreshed(_))
    }
}
