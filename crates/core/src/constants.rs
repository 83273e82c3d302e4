use chrono::TimeDelta;

const MIB: u64 = 1024 * 1024;

/// Job id of the deferred "start blockchain sync" job
pub const SYNC_JOB_ID: u32 = 1000;

/// Latest point at which the scheduler must run the job
pub const SYNC_MAX_DEADLINE: TimeDelta = TimeDelta::days(7);

/// Wallet used within this window counts as in active use
pub const LAST_USAGE_THRESHOLD_JUST: TimeDelta = TimeDelta::hours(1);

/// Wallet used within this window counts as used today
pub const LAST_USAGE_THRESHOLD_RECENTLY: TimeDelta = TimeDelta::days(2);

/// Wallet not used within this window counts as dormant
pub const LAST_USAGE_THRESHOLD_INACTIVE: TimeDelta = TimeDelta::weeks(4);

/// Battery percentage below which a sync is declined
pub const MIN_BATTERY_PERCENT: u8 = 15;

/// Free storage below which a sync is declined
pub const MIN_FREE_STORAGE_BYTES: u64 = 100 * MIB;

/// Blockchain file size above which only unmetered networks are requested
pub const UNMETERED_ONLY_BLOCKCHAIN_BYTES: u64 = 100 * MIB;

/// Blockchain file size above which metered syncs of idle wallets are avoided
pub const METERED_AVOID_BLOCKCHAIN_BYTES: u64 = 50 * MIB;

/// Version written into new settings documents
pub const SETTINGS_VERSION: u32 = 1;

/// First retry delay after a declined or failed sync start
pub const SYNC_RETRY_BACKOFF_INITIAL: TimeDelta = TimeDelta::seconds(30);

/// Upper bound of the retry delay
pub const SYNC_RETRY_BACKOFF_MAX: TimeDelta = TimeDelta::hours(5);
