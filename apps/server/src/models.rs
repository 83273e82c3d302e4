use chrono::{DateTime, Utc};
use goldwallet_core::sync as core_sync;
use goldwallet_rates::{ExchangeRate, RateRow, RefreshOutcome};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of a rate query: `(code, rate_coin, rate_fiat, source)` plus the
/// decimal fiat price of one coin.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateRow {
    pub currency_code: String,
    pub rate_coin: i64,
    pub rate_fiat: i64,
    pub source: String,
    #[schema(value_type = Option<f64>)]
    pub fiat_per_coin: Option<Decimal>,
}

impl From<RateRow> for ExchangeRateRow {
    fn from(row: RateRow) -> Self {
        let rate = ExchangeRate::from(row);
        Self {
            fiat_per_coin: rate.rate.fiat_per_coin(),
            currency_code: rate.currency_code,
            rate_coin: rate.rate.coin,
            rate_fiat: rate.rate.fiat,
            source: rate.source,
        }
    }
}

/// Result of a forced rate refresh.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    /// REFRESHED, UNCHANGED or FAILED
    pub status: String,
    pub currency_count: usize,
    pub last_updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RefreshSummary {
    pub fn new(
        outcome: &RefreshOutcome,
        currency_count: usize,
        last_updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        let (status, error) = match outcome {
            RefreshOutcome::Refreshed(_) => ("REFRESHED", None),
            RefreshOutcome::Unchanged => ("UNCHANGED", None),
            RefreshOutcome::Failed(reason) => ("FAILED", Some(reason.clone())),
        };
        Self {
            status: status.to_string(),
            currency_count,
            last_updated_at,
            error,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeCurrency {
    /// Selected currency, `null` when the fallback chain decides
    pub currency_code: Option<String>,
    /// Rate the wallet would display for the selection right now
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<ExchangeRateRow>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeCurrencyUpdate {
    pub currency_code: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledJob {
    pub job_id: u32,
    /// RECENT, TODAY, INACTIVE or DORMANT
    pub tier: String,
    pub min_delay_secs: i64,
    pub max_deadline_secs: i64,
    /// ANY or UNMETERED
    pub network: String,
    pub battery_not_low: bool,
    pub storage_not_low: bool,
    pub persisted: bool,
    /// Whether the job scheduler took the job
    pub accepted: bool,
}

impl From<core_sync::ScheduledJob> for ScheduledJob {
    fn from(job: core_sync::ScheduledJob) -> Self {
        let tier = match job.tier {
            core_sync::UsageTier::Recent => "RECENT",
            core_sync::UsageTier::Today => "TODAY",
            core_sync::UsageTier::Inactive => "INACTIVE",
            core_sync::UsageTier::Dormant => "DORMANT",
        }
        .to_string();
        let network = match job.spec.network {
            core_sync::NetworkRequirement::Any => "ANY",
            core_sync::NetworkRequirement::Unmetered => "UNMETERED",
        }
        .to_string();
        Self {
            job_id: job.spec.job_id,
            tier,
            min_delay_secs: job.spec.min_delay.num_seconds(),
            max_deadline_secs: job.spec.max_deadline.num_seconds(),
            network,
            battery_not_low: job.spec.battery_not_low,
            storage_not_low: job.spec.storage_not_low,
            persisted: job.spec.persisted,
            accepted: job.accepted,
        }
    }
}

/// Outcome of one run of the sync job.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SyncRun {
    /// STARTED or RESCHEDULED
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The job armed for the next run
    pub next: ScheduledJob,
}

impl SyncRun {
    pub fn new(outcome: &core_sync::JobOutcome, next: core_sync::ScheduledJob) -> Self {
        let (status, reason) = match outcome {
            core_sync::JobOutcome::Started => ("STARTED", None),
            core_sync::JobOutcome::Rescheduled { reason } => {
                ("RESCHEDULED", Some(reason.to_string()))
            }
        };
        Self {
            status: status.to_string(),
            reason,
            next: next.into(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapRequest {
    /// Host action name, e.g. `boot_completed`
    pub action: String,
}
