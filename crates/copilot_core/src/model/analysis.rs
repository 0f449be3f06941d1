//! Analysis domain model.
//!
//! # Responsibility
//! - Define the action-item record and the persisted analysis record.
//! - Own the serialized task wire shape used by the `analyses.tasks` column.
//!
//! # Invariants
//! - `Task` serializes as `{"task": <text>, "done": <bool>}`.
//! - Tasks extracted from a model reply always start with `done = false`.
//! - `AnalysisRecord::tasks` is a frozen snapshot taken at insert time.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Row identifier assigned by the store on insert.
///
/// Monotonic by insertion order (`AUTOINCREMENT`).
pub type AnalysisId = i64;

/// Single extracted action item with a completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Serialized as `task` to stay compatible with existing data files.
    #[serde(rename = "task")]
    pub text: String,
    pub done: bool,
}

impl Task {
    /// Creates a not-done task.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: false,
        }
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.done = !self.done;
        self.done
    }
}

/// One persisted analysis as read back from history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    /// UTC insert time assigned by SQLite `CURRENT_TIMESTAMP`.
    pub created_at: NaiveDateTime,
    pub summary: String,
    pub tasks: Vec<Task>,
}

impl AnalysisRecord {
    /// Re-serializes the task snapshot in the stored JSON shape.
    pub fn tasks_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.tasks)
    }

    /// Timestamp label used by history views (`YYYY-MM-DD HH:MM`).
    pub fn created_at_label(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M").to_string()
    }
}
