//! The whole-document container and its CRUD operations.
//!
//! The entire household state lives in one [`Document`]: ordered rooms
//! (each with nested tasks), members, and the monotonic counters used to
//! generate identifiers. Every mutating operation loads the whole
//! document, applies one change, and persists the whole document back;
//! lookups are linear scans over small lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ChoreError;
use crate::due;
use crate::member::Member;
use crate::recurrence::Recurrence;
use crate::room::Room;
use crate::task::Task;

/// Monotonic counters backing identifier generation.
///
/// Counters only ever increase, so identifiers are never reused even
/// after deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdCounters {
    /// Next room number.
    pub room: u64,
    /// Next task number.
    pub task: u64,
    /// Next member number.
    pub member: u64,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            room: 1,
            task: 1,
            member: 1,
        }
    }
}

/// The whole household document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Rooms in user-controlled display order.
    pub rooms: Vec<Room>,
    /// Household members in insertion order.
    pub members: Vec<Member>,
    /// Identifier counters.
    pub next_ids: IdCounters,
}

impl Document {
    /// The seeded starter document used when no data file exists yet.
    #[must_use]
    pub fn starter() -> Self {
        let mut kitchen = Room::new(
            "room1".to_string(),
            "Kitchen".to_string(),
            Some(Recurrence::Days(7)),
            None,
        );
        kitchen.tasks.push(Task::new(
            "task1".to_string(),
            "Wipe counters".to_string(),
            Some(Recurrence::Days(1)),
            None,
        ));
        kitchen.tasks.push(Task::new(
            "task2".to_string(),
            "Do dishes".to_string(),
            Some(Recurrence::Days(1)),
            None,
        ));

        let mut living_room = Room::new(
            "room2".to_string(),
            "Living Room".to_string(),
            Some(Recurrence::Days(7)),
            None,
        );
        living_room.tasks.push(Task::new(
            "task3".to_string(),
            "Vacuum floor".to_string(),
            Some(Recurrence::Days(7)),
            None,
        ));

        Self {
            rooms: vec![kitchen, living_room],
            members: vec![
                Member {
                    id: "member1".to_string(),
                    name: "Alice".to_string(),
                },
                Member {
                    id: "member2".to_string(),
                    name: "Bob".to_string(),
                },
            ],
            next_ids: IdCounters {
                room: 3,
                task: 4,
                member: 3,
            },
        }
    }

    // -----------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------

    /// Returns the room with the given ID, if present.
    #[must_use]
    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    /// Returns the member with the given ID, if present.
    #[must_use]
    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    fn room_mut(&mut self, room_id: &str) -> Result<&mut Room, ChoreError> {
        self.rooms
            .iter_mut()
            .find(|r| r.id == room_id)
            .ok_or_else(|| ChoreError::RoomNotFound(room_id.to_string()))
    }

    fn task_mut(&mut self, room_id: &str, task_id: &str) -> Result<&mut Task, ChoreError> {
        self.room_mut(room_id)?
            .task_mut(task_id)
            .ok_or_else(|| ChoreError::TaskNotFound(task_id.to_string()))
    }

    /// Checks that an optional assignee references an existing member.
    fn check_assignee(&self, assigned_to: Option<&str>) -> Result<(), ChoreError> {
        match assigned_to {
            Some(id) if self.member(id).is_none() => {
                Err(ChoreError::MemberNotFound(id.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn check_name(name: &str) -> Result<(), ChoreError> {
        if name.trim().is_empty() {
            Err(ChoreError::NameEmpty)
        } else {
            Ok(())
        }
    }

    fn check_recurrence(recurrence: Option<&Recurrence>) -> Result<(), ChoreError> {
        recurrence.map_or(Ok(()), Recurrence::validate)
    }

    // -----------------------------------------------------------------
    // Rooms
    // -----------------------------------------------------------------

    /// Adds a room and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreError::NameEmpty`], [`ChoreError::InvalidRecurrence`],
    /// or [`ChoreError::MemberNotFound`] for an unknown assignee.
    pub fn add_room(
        &mut self,
        name: &str,
        default_recurrence: Option<Recurrence>,
        assigned_to: Option<String>,
    ) -> Result<Room, ChoreError> {
        Self::check_name(name)?;
        Self::check_recurrence(default_recurrence.as_ref())?;
        self.check_assignee(assigned_to.as_deref())?;

        let id = format!("room{}", self.next_ids.room);
        self.next_ids.room += 1;
        let room = Room::new(id, name.trim().to_string(), default_recurrence, assigned_to);
        self.rooms.push(room.clone());
        Ok(room)
    }

    /// Updates a room's default recurrence; `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreError::RoomNotFound`] or [`ChoreError::InvalidRecurrence`].
    pub fn update_room_recurrence(
        &mut self,
        room_id: &str,
        recurrence: Option<Recurrence>,
    ) -> Result<(), ChoreError> {
        Self::check_recurrence(recurrence.as_ref())?;
        self.room_mut(room_id)?.default_recurrence = recurrence;
        Ok(())
    }

    /// Sets or clears a room's assignee.
    ///
    /// Assigning a member cascades once onto every task in the room,
    /// overwriting existing per-task assignments. Clearing the room
    /// assignee leaves task assignments untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreError::RoomNotFound`] or [`ChoreError::MemberNotFound`].
    pub fn assign_room(
        &mut self,
        room_id: &str,
        member: Option<String>,
    ) -> Result<(), ChoreError> {
        self.check_assignee(member.as_deref())?;
        let room = self.room_mut(room_id)?;
        room.assigned_to.clone_from(&member);
        if member.is_some() {
            for task in &mut room.tasks {
                task.assigned_to.clone_from(&member);
            }
        }
        Ok(())
    }

    /// Moves the dragged room to the target room's position.
    ///
    /// Both indices are resolved before the dragged room is removed, so
    /// dragging downward lands after the target and dragging upward lands
    /// before it.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreError::RoomNotFound`] if either room is absent.
    pub fn reorder_room(&mut self, dragged_id: &str, target_id: &str) -> Result<(), ChoreError> {
        let dragged_index = self
            .rooms
            .iter()
            .position(|r| r.id == dragged_id)
            .ok_or_else(|| ChoreError::RoomNotFound(dragged_id.to_string()))?;
        let target_index = self
            .rooms
            .iter()
            .position(|r| r.id == target_id)
            .ok_or_else(|| ChoreError::RoomNotFound(target_id.to_string()))?;

        let room = self.rooms.remove(dragged_index);
        let target_index = target_index.min(self.rooms.len());
        self.rooms.insert(target_index, room);
        Ok(())
    }

    /// Removes a room and all its tasks. Returns whether it existed.
    pub fn remove_room(&mut self, room_id: &str) -> bool {
        let before = self.rooms.len();
        self.rooms.retain(|r| r.id != room_id);
        self.rooms.len() != before
    }

    // -----------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------

    /// Adds a task to a room and returns it.
    ///
    /// A task created without a recurrence inherits the room's default.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreError::RoomNotFound`], [`ChoreError::NameEmpty`],
    /// [`ChoreError::InvalidRecurrence`], or [`ChoreError::MemberNotFound`]
    /// for an unknown assignee.
    pub fn add_task(
        &mut self,
        room_id: &str,
        name: &str,
        recurrence: Option<Recurrence>,
        assigned_to: Option<String>,
    ) -> Result<Task, ChoreError> {
        Self::check_name(name)?;
        Self::check_recurrence(recurrence.as_ref())?;
        self.check_assignee(assigned_to.as_deref())?;

        let id = format!("task{}", self.next_ids.task);
        let trimmed = name.trim().to_string();
        let room = self.room_mut(room_id)?;
        let recurrence = recurrence.or_else(|| room.default_recurrence.clone());
        let task = Task::new(id, trimmed, recurrence, assigned_to);
        room.tasks.push(task.clone());
        self.next_ids.task += 1;
        Ok(task)
    }

    /// Marks a task complete or incomplete and returns the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreError::RoomNotFound`] or [`ChoreError::TaskNotFound`].
    pub fn set_task_completed(
        &mut self,
        room_id: &str,
        task_id: &str,
        completed: bool,
        now: DateTime<Utc>,
    ) -> Result<Task, ChoreError> {
        let task = self.task_mut(room_id, task_id)?;
        due::set_completed(task, completed, now);
        Ok(task.clone())
    }

    /// Updates a task's recurrence; `None` clears it (making it one-shot).
    ///
    /// # Errors
    ///
    /// Returns [`ChoreError::RoomNotFound`], [`ChoreError::TaskNotFound`],
    /// or [`ChoreError::InvalidRecurrence`].
    pub fn update_task_recurrence(
        &mut self,
        room_id: &str,
        task_id: &str,
        recurrence: Option<Recurrence>,
    ) -> Result<(), ChoreError> {
        Self::check_recurrence(recurrence.as_ref())?;
        self.task_mut(room_id, task_id)?.recurrence = recurrence;
        Ok(())
    }

    /// Assigns a task to a member, or unassigns it with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreError::RoomNotFound`], [`ChoreError::TaskNotFound`],
    /// or [`ChoreError::MemberNotFound`].
    pub fn assign_task(
        &mut self,
        room_id: &str,
        task_id: &str,
        member: Option<String>,
    ) -> Result<(), ChoreError> {
        self.check_assignee(member.as_deref())?;
        self.task_mut(room_id, task_id)?.assigned_to = member;
        Ok(())
    }

    /// Removes a task. Returns whether it existed.
    pub fn remove_task(&mut self, room_id: &str, task_id: &str) -> bool {
        let Some(room) = self.rooms.iter_mut().find(|r| r.id == room_id) else {
            return false;
        };
        let before = room.tasks.len();
        room.tasks.retain(|t| t.id != task_id);
        room.tasks.len() != before
    }

    /// Removes one completion-history entry by index. Returns whether an
    /// entry was removed; an out-of-range index (or absent room/task) is
    /// a no-op.
    pub fn remove_history_entry(&mut self, room_id: &str, task_id: &str, index: usize) -> bool {
        let Ok(task) = self.task_mut(room_id, task_id) else {
            return false;
        };
        if index < task.history.len() {
            task.history.remove(index);
            true
        } else {
            false
        }
    }

    // -----------------------------------------------------------------
    // Members
    // -----------------------------------------------------------------

    /// Adds a member and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreError::NameEmpty`].
    pub fn add_member(&mut self, name: &str) -> Result<Member, ChoreError> {
        Self::check_name(name)?;
        let id = format!("member{}", self.next_ids.member);
        self.next_ids.member += 1;
        let member = Member {
            id,
            name: name.trim().to_string(),
        };
        self.members.push(member.clone());
        Ok(member)
    }

    /// Removes a member, clearing every task and room assignment that
    /// referenced it. Returns whether the member existed.
    ///
    /// Referential integrity is enforced here, not by the store: the
    /// cascade runs even when the member is already gone, so a document
    /// with dangling references heals on the next delete.
    pub fn remove_member(&mut self, member_id: &str) -> bool {
        for room in &mut self.rooms {
            if room.assigned_to.as_deref() == Some(member_id) {
                room.assigned_to = None;
            }
            for task in &mut room.tasks {
                if task.assigned_to.as_deref() == Some(member_id) {
                    task.assigned_to = None;
                }
            }
        }
        let before = self.members.len();
        self.members.retain(|m| m.id != member_id);
        self.members.len() != before
    }

    // -----------------------------------------------------------------
    // Rollover
    // -----------------------------------------------------------------

    /// Applies [`due::roll_over`] to every task in the document.
    ///
    /// Returns whether any task changed, so the caller knows to persist.
    pub fn roll_over_all(&mut self, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        for room in &mut self.rooms {
            for task in &mut room.tasks {
                changed |= due::roll_over(task, now);
            }
        }
        changed
    }
}
