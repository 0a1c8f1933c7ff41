// tests/property_recurrence.rs

use std::time::{Duration, Instant};

use proptest::prelude::*;
use scripthook::recurrence::RecurrencePolicy;

/// Monotonic evaluation times as millisecond offsets from a fixed start.
fn offsets_strategy() -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::vec(0..120_000u64, 1..40).prop_map(|mut v| {
        v.sort_unstable();
        v
    })
}

fn policy_strategy() -> impl Strategy<Value = RecurrencePolicy> {
    prop_oneof![
        Just(RecurrencePolicy::once()),
        (0..90u64).prop_map(|s| RecurrencePolicy::delayed_reset(Duration::from_secs(s))),
        (0..90u64).prop_map(|s| RecurrencePolicy::until_dismissed(Duration::from_secs(s))),
    ]
}

proptest! {
    #[test]
    fn denied_evaluations_never_mutate_last_fired(
        mut policy in policy_strategy(),
        offsets in offsets_strategy(),
    ) {
        let start = Instant::now();
        for ms in offsets {
            let now = start + Duration::from_millis(ms);
            let before = policy.last_fired_at();
            if policy.should_fire(now) {
                prop_assert_eq!(policy.last_fired_at(), Some(now));
            } else {
                prop_assert_eq!(policy.last_fired_at(), before);
            }
        }
    }

    #[test]
    fn once_permits_exactly_one_evaluation(offsets in offsets_strategy()) {
        let start = Instant::now();
        let mut policy = RecurrencePolicy::once();
        let permitted = offsets
            .iter()
            .filter(|ms| policy.should_fire(start + Duration::from_millis(**ms)))
            .count();
        prop_assert_eq!(permitted, 1);
    }

    #[test]
    fn delayed_reset_fires_are_at_least_a_period_apart(
        period_s in 1..60u64,
        offsets in offsets_strategy(),
    ) {
        let start = Instant::now();
        let period = Duration::from_secs(period_s);
        let mut policy = RecurrencePolicy::delayed_reset(period);
        let mut last: Option<Instant> = None;

        for ms in offsets {
            let now = start + Duration::from_millis(ms);
            let expected = last.is_none_or(|l| now.duration_since(l) >= period);
            prop_assert_eq!(policy.should_fire(now), expected);
            if expected {
                last = Some(now);
            }
        }
    }

    #[test]
    fn dismissed_policy_denies_everything(
        period_s in 0..60u64,
        offsets in offsets_strategy(),
    ) {
        let start = Instant::now();
        let mut policy = RecurrencePolicy::until_dismissed(Duration::from_secs(period_s));
        policy.dismiss();

        for ms in offsets {
            prop_assert!(!policy.should_fire(start + Duration::from_millis(ms)));
        }
        prop_assert_eq!(policy.last_fired_at(), None);
    }
}
