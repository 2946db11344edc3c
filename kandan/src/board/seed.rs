//! Demo seed data for a freshly initialized board.

use kandan_core::{BoardState, Column, Task, TaskId};

use super::now_ms;

/// Builds the demo board: five tasks spread across the three columns,
/// with creation times offset into the recent past.
#[must_use]
pub fn demo_board() -> BoardState {
    let now = now_ms();
    let task = |title: &str, description: &str, column, age_ms: u64| Task {
        id: TaskId::new(),
        title: title.to_string(),
        description: description.to_string(),
        column,
        created_at: now.saturating_sub(age_ms),
    };

    BoardState::from_tasks(vec![
        task(
            "Exercise 1 hour",
            "List all deliverables and timelines",
            Column::Todo,
            86_400_000,
        ),
        task(
            "Read book 30 minutes",
            "Review current component library",
            Column::Todo,
            43_200_000,
        ),
        task(
            "Solve 2 DSA problems",
            "Connect backend endpoints to frontend",
            Column::Progress,
            72_000_000,
        ),
        task(
            "30 min meditation",
            "Mobile-first breakpoints across all pages",
            Column::Progress,
            36_000_000,
        ),
        task(
            "Apply to 5 jobs",
            "Login, register, and token management",
            Column::Done,
            100_000_000,
        ),
    ])
}
