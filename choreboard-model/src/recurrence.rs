//! Recurrence intervals for chores.
//!
//! A recurrence is stored either as a count of days or as a named
//! frequency. Both forms appear in real documents (the UI offers named
//! frequencies, the API accepts day counts), so the serialized
//! representation is untagged: a number means days, a string means a
//! named frequency.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::ChoreError;

/// Fallback interval in days for malformed stored recurrence values.
///
/// A hand-edited document can contain a day count below one or an
/// unrecognized frequency name. The engine resolves those to this default
/// instead of failing the request; the API boundary rejects them on the
/// way in, so the fallback only ever applies to stored state.
pub const DEFAULT_INTERVAL_DAYS: i64 = 1;

/// How often a task becomes due again after being completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recurrence {
    /// Every N days.
    Days(i64),
    /// A named frequency: `daily`, `weekly`, or `monthly`.
    Named(String),
}

impl Recurrence {
    /// Resolves this recurrence to a concrete interval.
    ///
    /// Non-positive day counts and unrecognized frequency names resolve
    /// to the one-day default rather than failing.
    #[must_use]
    pub fn interval(&self) -> TimeDelta {
        let days = match self {
            Self::Days(d) if *d >= 1 => *d,
            Self::Days(_) => DEFAULT_INTERVAL_DAYS,
            Self::Named(name) => match name.to_ascii_lowercase().as_str() {
                "daily" => 1,
                "weekly" => 7,
                "monthly" => 30,
                _ => DEFAULT_INTERVAL_DAYS,
            },
        };
        TimeDelta::try_days(days).unwrap_or_else(|| TimeDelta::days(DEFAULT_INTERVAL_DAYS))
    }

    /// Validates a recurrence supplied at the API boundary.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreError::InvalidRecurrence`] for day counts below one
    /// and for frequency names other than `daily`, `weekly`, `monthly`.
    pub fn validate(&self) -> Result<(), ChoreError> {
        match self {
            Self::Days(d) if *d >= 1 => Ok(()),
            Self::Named(name)
                if matches!(
                    name.to_ascii_lowercase().as_str(),
                    "daily" | "weekly" | "monthly"
                ) =>
            {
                Ok(())
            }
            _ => Err(ChoreError::InvalidRecurrence),
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Days(d) => write!(f, "every {d} day(s)"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}
