//! Display-side view model for the board.
//!
//! Rendering itself lives outside this crate; [`App`] prepares what a
//! renderer needs: tasks grouped by column in board order, pending flags,
//! and human-readable timestamps.

use kandan_core::{BoardState, Column, TaskId};

use crate::board::BoardManager;
use crate::remote::RemoteCall;

/// A task prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// Task identifier.
    pub id: TaskId,
    /// Card title.
    pub title: String,
    /// Card description.
    pub description: String,
    /// Relative age label, e.g. "2h ago".
    pub age: String,
    /// Whether the task has a remote operation outstanding.
    pub pending: bool,
}

/// View model over the board state for a consuming surface.
#[derive(Debug, Default)]
pub struct App {
    /// Logged-in display name, if any.
    pub user: Option<String>,
    board: BoardState,
    pending: Vec<TaskId>,
}

impl App {
    /// Creates an empty view model.
    #[must_use]
    pub fn new(user: Option<String>) -> Self {
        Self {
            user,
            board: BoardState::new(),
            pending: Vec::new(),
        }
    }

    /// Pulls a fresh consistent view from the manager.
    pub fn refresh<R: RemoteCall>(&mut self, manager: &BoardManager<R>) {
        self.board = manager.state();
        self.pending = manager.pending_ids();
    }

    /// Cards in the given column, in board order.
    #[must_use]
    pub fn cards(&self, column: Column, now_ms: u64) -> Vec<CardView> {
        self.board
            .in_column(column)
            .into_iter()
            .map(|task| CardView {
                id: task.id,
                title: task.title.clone(),
                description: task.description.clone(),
                age: time_ago(task.created_at, now_ms),
                pending: self.pending.contains(&task.id),
            })
            .collect()
    }

    /// Number of cards in the given column.
    #[must_use]
    pub fn column_count(&self, column: Column) -> usize {
        self.board.in_column(column).len()
    }
}

/// Formats a creation timestamp relative to `now_ms`.
#[must_use]
pub fn time_ago(created_at_ms: u64, now_ms: u64) -> String {
    let diff_secs = now_ms.saturating_sub(created_at_ms) / 1000;
    match diff_secs {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{}m ago", diff_secs / 60),
        3600..=86_399 => format!("{}h ago", diff_secs / 3600),
        _ => format!("{}d ago", diff_secs / 86_400),
    }
}

/// Formats a creation timestamp as wall-clock time using a chrono format
/// string (the configurable `timestamp_format`).
#[must_use]
pub fn clock_label(created_at_ms: u64, format: &str) -> String {
    chrono::DateTime::from_timestamp_millis(i64::try_from(created_at_ms).unwrap_or(0))
        .map(|dt| dt.format(format).to_string())
        .unwrap_or_default()
}
