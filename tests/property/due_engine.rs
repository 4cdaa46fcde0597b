//! Property-based tests for the due-date engine.
//!
//! Uses proptest to verify:
//! 1. For completed recurring tasks, `is_due` agrees with the direct
//!    `now >= last_done + interval` comparison, boundary inclusive.
//! 2. `roll_over` is idempotent: a second call at the same instant never
//!    changes the task again.
//! 3. Complete followed by un-complete restores the empty completion
//!    record for any starting state.
//! 4. Any recurrence value, however malformed, resolves to a positive
//!    interval (the engine never fails on stored state).

use chrono::{DateTime, TimeDelta, Utc};
use choreboard_model::{Recurrence, Task, due};
use proptest::prelude::*;

/// Strategy for instants across a few decades around the epoch of
/// interest, at second precision.
fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..2_524_608_000i64).prop_map(|secs| {
        DateTime::from_timestamp(secs, 0).unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH)
    })
}

/// Strategy for well-formed recurrence values.
fn arb_valid_recurrence() -> impl Strategy<Value = Recurrence> {
    prop_oneof![
        (1i64..=365).prop_map(Recurrence::Days),
        prop_oneof![
            Just("daily".to_string()),
            Just("weekly".to_string()),
            Just("monthly".to_string()),
        ]
        .prop_map(Recurrence::Named),
    ]
}

/// Strategy for arbitrary (possibly malformed) recurrence values.
fn arb_any_recurrence() -> impl Strategy<Value = Recurrence> {
    prop_oneof![
        any::<i64>().prop_map(Recurrence::Days),
        "[a-z]{0,12}".prop_map(Recurrence::Named),
    ]
}

fn task_with(recurrence: Option<Recurrence>, done: bool, last_done: Option<DateTime<Utc>>) -> Task {
    Task {
        id: "task1".to_string(),
        name: "Dishes".to_string(),
        recurrence,
        assigned_to: None,
        done,
        last_done,
        history: last_done.into_iter().collect(),
    }
}

proptest! {
    #[test]
    fn due_matches_direct_comparison_with_inclusive_boundary(
        recurrence in arb_valid_recurrence(),
        last_done in arb_instant(),
        offset_secs in -40_000_000i64..40_000_000,
    ) {
        let now = last_done + TimeDelta::seconds(offset_secs);
        let task = task_with(Some(recurrence.clone()), true, Some(last_done));
        let expected = now >= last_done + recurrence.interval();
        prop_assert_eq!(due::is_due(&task, now), expected);
    }

    #[test]
    fn never_completed_is_always_due(
        recurrence in proptest::option::of(arb_any_recurrence()),
        done in any::<bool>(),
        now in arb_instant(),
    ) {
        let task = task_with(recurrence, done, None);
        prop_assert!(due::is_due(&task, now));
    }

    #[test]
    fn roll_over_twice_equals_roll_over_once(
        recurrence in proptest::option::of(arb_any_recurrence()),
        done in any::<bool>(),
        last_done in proptest::option::of(arb_instant()),
        now in arb_instant(),
    ) {
        let mut task = task_with(recurrence, done, last_done);
        due::roll_over(&mut task, now);
        let after_first = task.clone();
        prop_assert!(!due::roll_over(&mut task, now));
        prop_assert_eq!(task, after_first);
    }

    #[test]
    fn complete_then_uncomplete_restores_empty_record(
        recurrence in proptest::option::of(arb_valid_recurrence()),
        now in arb_instant(),
    ) {
        let mut task = task_with(recurrence, false, None);
        due::set_completed(&mut task, true, now);
        due::set_completed(&mut task, false, now);
        prop_assert!(!task.done);
        prop_assert_eq!(task.last_done, None);
        prop_assert!(task.history.is_empty());
    }

    #[test]
    fn any_recurrence_resolves_to_positive_interval(recurrence in arb_any_recurrence()) {
        prop_assert!(recurrence.interval() > TimeDelta::zero());
    }
}
