//! Property-based integration tests for the sync scheduling policy.
//!
//! These tests verify that the tier, backoff and guard rules hold across
//! arbitrary inputs, using `proptest` for random test case generation.

use chrono::TimeDelta;
use proptest::prelude::*;

use goldwallet_core::constants::{MIN_BATTERY_PERCENT, MIN_FREE_STORAGE_BYTES};
use goldwallet_core::power::PowerState;
use goldwallet_core::sync::{
    DeclineReason, DeviceConditions, GuardDecision, SyncGuard, SyncJobSpec, UsageTier,
};

// =============================================================================
// Generators
// =============================================================================

/// Up to ten weeks, in seconds.
fn arb_last_used_ago() -> impl Strategy<Value = Option<TimeDelta>> {
    prop_oneof![
        1 => Just(None),
        9 => (0_i64..10 * 7 * 24 * 3600).prop_map(|s| Some(TimeDelta::seconds(s))),
    ]
}

fn arb_power_state() -> impl Strategy<Value = Option<PowerState>> {
    prop::option::of((any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(power_save_mode, device_idle, ignoring_battery_optimizations)| PowerState {
            power_save_mode,
            device_idle,
            ignoring_battery_optimizations,
        },
    ))
}

fn arb_conditions() -> impl Strategy<Value = DeviceConditions> {
    (
        prop::option::of(0_u8..=100),
        arb_power_state(),
        prop::option::of(0_u64..4 * MIN_FREE_STORAGE_BYTES),
        any::<bool>(),
        0_u64..400 * 1024 * 1024,
        arb_last_used_ago(),
    )
        .prop_map(
            |(
                battery_percent,
                power,
                free_storage_bytes,
                network_metered,
                blockchain_file_bytes,
                last_used_ago,
            )| DeviceConditions {
                battery_percent,
                power,
                free_storage_bytes,
                network_metered,
                blockchain_file_bytes,
                last_used_ago,
            },
        )
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// A wallet used longer ago never syncs more often.
    #[test]
    fn prop_interval_grows_with_idle_time(a in 0_i64..10_000_000, b in 0_i64..10_000_000) {
        let (shorter, longer) = if a <= b { (a, b) } else { (b, a) };
        let near = UsageTier::from_last_used_ago(Some(TimeDelta::seconds(shorter)));
        let far = UsageTier::from_last_used_ago(Some(TimeDelta::seconds(longer)));
        prop_assert!(near.sync_interval() <= far.sync_interval());
    }

    /// Every tier interval is one of the four published ones.
    #[test]
    fn prop_interval_is_a_known_tier(ago in arb_last_used_ago()) {
        let interval = UsageTier::from_last_used_ago(ago).sync_interval();
        prop_assert!([
            TimeDelta::minutes(15),
            TimeDelta::hours(1),
            TimeDelta::hours(12),
            TimeDelta::days(1),
        ]
        .contains(&interval));
    }

    /// Retry delays stay between 30 seconds and 5 hours.
    #[test]
    fn prop_retry_backoff_is_bounded(attempt in 0_u32..1000) {
        let delay = SyncJobSpec::for_tier(UsageTier::Recent, 0).retry(attempt).min_delay;
        prop_assert!(delay >= TimeDelta::seconds(30));
        prop_assert!(delay <= TimeDelta::hours(5));
    }

    /// A proceed verdict implies every individual floor holds.
    #[test]
    fn prop_proceed_implies_all_floors_hold(conditions in arb_conditions()) {
        if SyncGuard::default().evaluate(&conditions) == GuardDecision::Proceed {
            prop_assert!(conditions.battery_percent.map_or(true, |p| p >= MIN_BATTERY_PERCENT));
            prop_assert!(conditions.free_storage_bytes.is_some_and(|b| b >= MIN_FREE_STORAGE_BYTES));
            prop_assert!(!conditions.power.is_some_and(|p| p.power_save_mode));
        }
    }

    /// A low battery always declines, whatever else holds.
    #[test]
    fn prop_low_battery_always_declines(
        conditions in arb_conditions(),
        percent in 0_u8..MIN_BATTERY_PERCENT,
    ) {
        let conditions = DeviceConditions { battery_percent: Some(percent), ..conditions };
        prop_assert_eq!(
            SyncGuard::default().evaluate(&conditions),
            GuardDecision::Decline(DeclineReason::LowBattery { percent })
        );
    }
}
