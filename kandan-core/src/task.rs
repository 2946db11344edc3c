//! Task records and the fixed column set.
//!
//! A [`Task`] is a plain value; the board never holds a task whose
//! [`Column`] is outside the three fixed variants because the type system
//! makes such a task unrepresentable.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum allowed task title length in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 256;

/// Unique identifier for a task, based on UUID v7 for time-ordering.
///
/// The same type covers provisional identifiers (generated client-side when
/// a create is applied optimistically) and assigned identifiers (issued at
/// commit). The dispatcher tracks which is which; the id itself is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three fixed board columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Work that has not been started.
    Todo,
    /// Work in progress.
    Progress,
    /// Finished work.
    Done,
}

impl Column {
    /// All columns in board order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::Progress, Self::Done];

    /// Human-readable column heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::Progress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Todo => write!(f, "todo"),
            Self::Progress => write!(f, "progress"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Error returned when parsing an unrecognized column name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized column: {0:?} (expected todo, progress, or done)")]
pub struct ParseColumnError(pub String);

impl std::str::FromStr for Column {
    type Err = ParseColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "progress" => Ok(Self::Progress),
            "done" => Ok(Self::Done),
            other => Err(ParseColumnError(other.to_string())),
        }
    }
}

/// A single task card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Short title shown on the card.
    pub title: String,
    /// Longer free-form description.
    pub description: String,
    /// Which column the task currently sits in.
    pub column: Column,
    /// When the task was created (milliseconds since epoch).
    pub created_at: u64,
}
