//! Blockchain sync scheduling models.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    LAST_USAGE_THRESHOLD_INACTIVE, LAST_USAGE_THRESHOLD_JUST, LAST_USAGE_THRESHOLD_RECENTLY,
    SYNC_JOB_ID, SYNC_MAX_DEADLINE, SYNC_RETRY_BACKOFF_INITIAL, SYNC_RETRY_BACKOFF_MAX,
    UNMETERED_ONLY_BLOCKCHAIN_BYTES,
};

/// How actively the wallet is used, derived from the time since last use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsageTier {
    /// Used within the last hour
    Recent,
    /// Used within the last two days
    Today,
    /// Used within the last four weeks
    Inactive,
    /// Not used for four weeks or more, or never
    Dormant,
}

impl UsageTier {
    pub fn from_last_used_ago(last_used_ago: Option<TimeDelta>) -> Self {
        match last_used_ago {
            Some(ago) if ago < LAST_USAGE_THRESHOLD_JUST => UsageTier::Recent,
            Some(ago) if ago < LAST_USAGE_THRESHOLD_RECENTLY => UsageTier::Today,
            Some(ago) if ago < LAST_USAGE_THRESHOLD_INACTIVE => UsageTier::Inactive,
            _ => UsageTier::Dormant,
        }
    }

    /// Minimum delay before the next sync for this tier.
    pub fn sync_interval(self) -> TimeDelta {
        match self {
            UsageTier::Recent => TimeDelta::minutes(15),
            UsageTier::Today => TimeDelta::hours(1),
            UsageTier::Inactive => TimeDelta::hours(12),
            UsageTier::Dormant => TimeDelta::days(1),
        }
    }
}

/// Network a scheduled job may run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkRequirement {
    Any,
    Unmetered,
}

/// Everything a job scheduler needs to arm the sync job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncJobSpec {
    pub job_id: u32,
    pub min_delay: TimeDelta,
    pub max_deadline: TimeDelta,
    pub network: NetworkRequirement,
    pub battery_not_low: bool,
    pub storage_not_low: bool,
    /// Survive a restart of the host
    pub persisted: bool,
}

impl SyncJobSpec {
    /// Job spec for the given usage tier and blockchain file size.
    pub fn for_tier(tier: UsageTier, blockchain_file_bytes: u64) -> Self {
        let network = if blockchain_file_bytes > UNMETERED_ONLY_BLOCKCHAIN_BYTES {
            NetworkRequirement::Unmetered
        } else {
            NetworkRequirement::Any
        };

        Self {
            job_id: SYNC_JOB_ID,
            min_delay: tier.sync_interval(),
            max_deadline: SYNC_MAX_DEADLINE,
            network,
            battery_not_low: true,
            storage_not_low: true,
            persisted: true,
        }
    }

    /// Same job, armed to retry after the given number of failed starts.
    ///
    /// The delay doubles per attempt, starting at 30 seconds and capped at
    /// five hours.
    pub fn retry(mut self, attempt: u32) -> Self {
        self.min_delay = retry_backoff(attempt);
        self
    }
}

fn retry_backoff(attempt: u32) -> TimeDelta {
    let factor = 1_i32 << attempt.saturating_sub(1).min(20);
    SYNC_RETRY_BACKOFF_INITIAL
        .checked_mul(factor)
        .map_or(SYNC_RETRY_BACKOFF_MAX, |delay| delay.min(SYNC_RETRY_BACKOFF_MAX))
}

/// Why the guard turned a sync down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeclineReason {
    LowBattery { percent: u8 },
    PowerSave,
    LowStorage { available_bytes: u64 },
    StorageUnknown,
    MeteredNetwork,
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclineReason::LowBattery { percent } => {
                write!(f, "battery level too low: {}%", percent)
            }
            DeclineReason::PowerSave => write!(f, "power save mode enabled"),
            DeclineReason::LowStorage { available_bytes } => {
                write!(f, "insufficient storage: {} bytes available", available_bytes)
            }
            DeclineReason::StorageUnknown => write!(f, "free storage could not be determined"),
            DeclineReason::MeteredNetwork => write!(f, "avoiding sync on metered network"),
        }
    }
}

/// Verdict of the sync guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Decline(DeclineReason),
}

/// Why a job asked to be run again later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cause", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RescheduleReason {
    Declined { reason: DeclineReason },
    StartFailed { message: String },
}

impl fmt::Display for RescheduleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RescheduleReason::Declined { reason } => write!(f, "{}", reason),
            RescheduleReason::StartFailed { message } => write!(f, "start failed: {}", message),
        }
    }
}

/// Result of running the sync job once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobOutcome {
    /// Sync was handed to the blockchain service
    Started,
    /// Nothing was started; run again after a backoff
    Rescheduled { reason: RescheduleReason },
}

/// A job spec together with what the scheduler made of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledJob {
    pub tier: UsageTier,
    pub spec: SyncJobSpec,
    pub accepted: bool,
}
