//! A single recorded performance of a habit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Immutable once created. `performed_at` is local time with second resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub habit_id: String,
    pub performed_at: NaiveDateTime,
}

impl Activity {
    pub fn new(id: impl Into<String>, habit_id: impl Into<String>, performed_at: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            habit_id: habit_id.into(),
            performed_at,
        }
    }
}
