//! The due-date engine.
//!
//! Pure functions deciding whether a task is currently actionable and
//! governing the completion-state transitions, including the automatic
//! rollover of a completed recurring task once its interval has elapsed.
//!
//! The engine never fails on valid inputs: malformed stored recurrence
//! values resolve to a one-day default inside [`Recurrence::interval`],
//! and a due date that would overflow the calendar is treated as never
//! arriving. Callers reject structurally invalid input (non-positive
//! intervals, unknown IDs) before reaching these functions.
//!
//! [`Recurrence::interval`]: crate::recurrence::Recurrence::interval

use chrono::{DateTime, Utc};

use crate::recurrence::Recurrence;
use crate::task::Task;

/// Returns whether the task's recurrence cycle has elapsed.
fn cycle_elapsed(last_done: DateTime<Utc>, recurrence: &Recurrence, now: DateTime<Utc>) -> bool {
    last_done
        .checked_add_signed(recurrence.interval())
        .is_some_and(|due_at| now >= due_at)
}

/// Decides whether a task should currently be surfaced as actionable.
///
/// Rules, in order:
/// - never completed (`last_done` is `None`): due, regardless of interval
///   (new tasks start actionable);
/// - no recurrence: due-ness is the inverse of the completion flag
///   (one-shot);
/// - otherwise: due exactly when `now >= last_done + interval`, inclusive
///   at the boundary.
#[must_use]
pub fn is_due(task: &Task, now: DateTime<Utc>) -> bool {
    let Some(last_done) = task.last_done else {
        return true;
    };
    match task.recurrence.as_ref() {
        None => !task.done,
        Some(recurrence) => cycle_elapsed(last_done, recurrence, now),
    }
}

/// Applies a completion-state change to a task.
///
/// Marking complete stamps `last_done` with `now` and appends to the
/// audit history. Marking incomplete clears `last_done` entirely and pops
/// the most recent history entry, so due-ness is a function of the
/// current cycle only and an explicit un-check never leaks stale history
/// into the next decision.
pub fn set_completed(task: &mut Task, completed: bool, now: DateTime<Utc>) {
    if completed {
        task.done = true;
        task.last_done = Some(now);
        task.history.push(now);
    } else {
        task.done = false;
        task.last_done = None;
        task.history.pop();
    }
}

/// Reopens a completed recurring task whose interval has elapsed.
///
/// Returns `true` if the task transitioned back to incomplete. `last_done`
/// is kept, so the task reads as due until it is completed again, and a
/// second call with the same `now` is a no-op.
///
/// Applied lazily during every list read rather than on a timer, so
/// due-ness is recomputed correctly no matter how long the system went
/// unobserved. The caller persists the document when any task rolled over.
pub fn roll_over(task: &mut Task, now: DateTime<Utc>) -> bool {
    if !task.done {
        return false;
    }
    let (Some(last_done), Some(recurrence)) = (task.last_done, task.recurrence.as_ref()) else {
        return false;
    };
    if cycle_elapsed(last_done, recurrence, now) {
        task.done = false;
        true
    } else {
        false
    }
}
