//! Read model returned to clients: the document with per-task due flags,
//! resolved assignee names, and optional member / due-only filtering.
//!
//! The caller applies rollover to the document before building a view, so
//! due flags here are computed over current-cycle state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::document::Document;
use crate::due;
use crate::member::Member;
use crate::recurrence::Recurrence;
use crate::room::Room;
use crate::task::Task;

/// Which assignee a view is filtered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberFilter {
    /// Only tasks with no assignee.
    Unassigned,
    /// Only tasks assigned to this member ID.
    Member(String),
}

impl MemberFilter {
    fn matches(&self, assigned_to: Option<&str>) -> bool {
        match self {
            Self::Unassigned => assigned_to.is_none(),
            Self::Member(id) => assigned_to == Some(id.as_str()),
        }
    }
}

/// Filters applied when building a [`DocumentView`].
#[derive(Debug, Clone, Default)]
pub struct ViewFilter {
    /// Restrict tasks to an assignee; `None` shows all tasks.
    pub member: Option<MemberFilter>,
    /// Show only tasks that are currently due.
    pub due_only: bool,
}

impl ViewFilter {
    fn keep(&self, task: &Task, is_due: bool) -> bool {
        if self.due_only && !is_due {
            return false;
        }
        self.member
            .as_ref()
            .is_none_or(|m| m.matches(task.assigned_to.as_deref()))
    }
}

/// A task as presented to clients.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    /// Task identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Recurrence, as stored.
    pub recurrence: Option<Recurrence>,
    /// Assignee member ID, as stored (possibly dangling).
    pub assigned_to: Option<String>,
    /// Resolved assignee name; `None` when unassigned or when the
    /// referenced member no longer exists.
    pub assignee_name: Option<String>,
    /// Completion flag after rollover.
    pub done: bool,
    /// Last completion time.
    pub last_done: Option<DateTime<Utc>>,
    /// Completion audit log, oldest first.
    pub history: Vec<DateTime<Utc>>,
    /// Whether the task is currently actionable.
    pub is_due: bool,
}

/// A room as presented to clients.
#[derive(Debug, Clone, Serialize)]
pub struct RoomView {
    /// Room identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Default recurrence for new tasks.
    pub default_recurrence: Option<Recurrence>,
    /// Room-level assignee member ID.
    pub assigned_to: Option<String>,
    /// Resolved room-level assignee name.
    pub assignee_name: Option<String>,
    /// Tasks surviving the filter, in insertion order.
    pub tasks: Vec<TaskView>,
}

/// The whole document as presented to clients.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    /// Rooms in display order. Rooms are always listed, even when every
    /// task in them is filtered out, so the client can offer adding
    /// tasks to any room.
    pub rooms: Vec<RoomView>,
    /// All members.
    pub members: Vec<Member>,
}

impl DocumentView {
    /// Builds a filtered view of the document at instant `now`.
    ///
    /// Dangling assignee references resolve to a missing name rather
    /// than an error; clients render those as "member not found".
    #[must_use]
    pub fn build(doc: &Document, now: DateTime<Utc>, filter: &ViewFilter) -> Self {
        Self {
            rooms: doc
                .rooms
                .iter()
                .map(|room| room_view(doc, room, now, filter))
                .collect(),
            members: doc.members.clone(),
        }
    }
}

fn resolve_name(doc: &Document, member_id: Option<&str>) -> Option<String> {
    member_id
        .and_then(|id| doc.member(id))
        .map(|m| m.name.clone())
}

fn room_view(doc: &Document, room: &Room, now: DateTime<Utc>, filter: &ViewFilter) -> RoomView {
    let tasks = room
        .tasks
        .iter()
        .filter_map(|task| {
            let is_due = due::is_due(task, now);
            filter.keep(task, is_due).then(|| TaskView {
                id: task.id.clone(),
                name: task.name.clone(),
                recurrence: task.recurrence.clone(),
                assigned_to: task.assigned_to.clone(),
                assignee_name: resolve_name(doc, task.assigned_to.as_deref()),
                done: task.done,
                last_done: task.last_done,
                history: task.history.clone(),
                is_due,
            })
        })
        .collect();

    RoomView {
        id: room.id.clone(),
        name: room.name.clone(),
        default_recurrence: room.default_recurrence.clone(),
        assigned_to: room.assigned_to.clone(),
        assignee_name: resolve_name(doc, room.assigned_to.as_deref()),
        tasks,
    }
}
