//! A household participant.

use serde::{Deserialize, Serialize};

/// A family member tasks can be assigned to, referenced by ID from
/// tasks' and rooms' `assigned_to` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique member identifier, generated from the document's counters.
    pub id: String,
    /// Display name.
    pub name: String,
}
