//! Domain model and due-date engine for Choreboard.
//!
//! Plain data types (rooms, tasks, members), the whole-document container
//! with its CRUD operations, and the pure due-date/rollover logic. No I/O
//! lives here; persistence and HTTP are the server crate's concern.

pub mod document;
pub mod due;
pub mod member;
pub mod recurrence;
pub mod room;
pub mod task;
pub mod view;

pub use document::Document;
pub use member::Member;
pub use recurrence::Recurrence;
pub use room::Room;
pub use task::Task;

use thiserror::Error;

/// Errors that can occur during document operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChoreError {
    /// Room with the given ID was not found.
    #[error("room not found: {0}")]
    RoomNotFound(String),
    /// Task with the given ID was not found.
    #[error("task not found: {0}")]
    TaskNotFound(String),
    /// Member with the given ID was not found.
    #[error("member not found: {0}")]
    MemberNotFound(String),
    /// A room, task, or member name was empty.
    #[error("name cannot be empty")]
    NameEmpty,
    /// A supplied recurrence was not a positive day count or a known
    /// named frequency.
    #[error("recurrence must be a positive number of days or one of daily/weekly/monthly")]
    InvalidRecurrence,
}
