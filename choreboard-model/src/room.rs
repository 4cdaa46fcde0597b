//! A named grouping of tasks.

use serde::{Deserialize, Serialize};

use crate::recurrence::Recurrence;
use crate::task::Task;

/// A room and the tasks it contains.
///
/// Room order within the document is significant and user-controlled;
/// task order within a room is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier, generated from the document's counters.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Recurrence applied to tasks created in this room without one of
    /// their own.
    #[serde(default)]
    pub default_recurrence: Option<Recurrence>,
    /// Optional room-level assignee. Setting it cascades once onto all
    /// contained tasks; it is not a persistent relationship.
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// Tasks in insertion order.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Room {
    /// Creates an empty room.
    #[must_use]
    pub fn new(
        id: String,
        name: String,
        default_recurrence: Option<Recurrence>,
        assigned_to: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            default_recurrence,
            assigned_to,
            tasks: Vec::new(),
        }
    }

    /// Returns the task with the given ID, if present.
    #[must_use]
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Returns a mutable reference to the task with the given ID.
    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }
}
