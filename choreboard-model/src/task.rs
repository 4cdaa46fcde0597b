//! A single chore within a room.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recurrence::Recurrence;

/// A chore tracked by the household.
///
/// The completion record is the single-last-completion form: `done` plus a
/// nullable `last_done` timestamp. `history` is an append-only audit log of
/// completion times kept for display; the due-date engine never consults it.
///
/// Every optional field defaults on deserialization so that hand-edited
/// documents with missing keys still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier, generated from the document's counters.
    pub id: String,
    /// Display name.
    pub name: String,
    /// How often the task recurs. `None` means one-shot: once done it
    /// never becomes due again on its own.
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    /// Member this task is assigned to, by member ID.
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// Whether the task is currently marked complete.
    #[serde(default)]
    pub done: bool,
    /// When the task was last completed.
    #[serde(default)]
    pub last_done: Option<DateTime<Utc>>,
    /// Audit log of completion times, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<DateTime<Utc>>,
}

impl Task {
    /// Creates a fresh, never-completed task.
    #[must_use]
    pub fn new(
        id: String,
        name: String,
        recurrence: Option<Recurrence>,
        assigned_to: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            recurrence,
            assigned_to,
            done: false,
            last_done: None,
            history: Vec::new(),
        }
    }
}
