//! The board state container and its pure transition function.
//!
//! [`BoardState`] is an ordered list of tasks. It never mutates in place:
//! [`BoardState::apply`] takes a [`Mutation`] and returns the next state,
//! leaving the original untouched. Transitions are total — any recognized
//! mutation on any valid state produces a valid state. Patching or removing
//! an id that is not present is a no-op; inserting a duplicate id must be
//! prevented by the caller (the dispatcher checks before inserting).

use serde::{Deserialize, Serialize};

use crate::task::{Column, Task, TaskId};

/// A recognized transition on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    /// Insert a task at the front of the list (newest first).
    InsertFront(Task),
    /// Insert a task at a specific index, clamped to the list length.
    ///
    /// Used to restore a deleted task at its original position.
    InsertAt {
        /// Position to insert at (clamped to `len`).
        index: usize,
        /// The task to insert.
        task: Task,
    },
    /// Change the column of the task with the given id.
    SetColumn {
        /// Target task.
        id: TaskId,
        /// New column.
        column: Column,
    },
    /// Rewrite a task's identifier, keeping every other field.
    ///
    /// Used to reconcile a provisional id with its assigned id when a
    /// create commits.
    ReplaceId {
        /// The provisional id currently in the store.
        from: TaskId,
        /// The assigned id to substitute.
        to: TaskId,
    },
    /// Remove the task with the given id.
    Remove(TaskId),
    /// Replace the whole board with the given state.
    Replace(BoardState),
}

/// Ordered collection of task records; a pure state container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    tasks: Vec<Task>,
}

impl BoardState {
    /// Creates an empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Creates a board from an ordered task list.
    #[must_use]
    pub const fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// All tasks in board order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks on the board.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the board holds no tasks.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Returns the index of a task in board order.
    #[must_use]
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Whether a task with the given id is present.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.position(id).is_some()
    }

    /// Tasks in the given column, preserving board order.
    #[must_use]
    pub fn in_column(&self, column: Column) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.column == column).collect()
    }

    /// Applies a mutation, returning the next state.
    ///
    /// The receiver is never modified. Mutations targeting an absent id
    /// leave the state unchanged.
    #[must_use]
    pub fn apply(&self, mutation: &Mutation) -> Self {
        match mutation {
            Mutation::InsertFront(task) => {
                let mut tasks = Vec::with_capacity(self.tasks.len() + 1);
                tasks.push(task.clone());
                tasks.extend(self.tasks.iter().cloned());
                Self { tasks }
            }
            Mutation::InsertAt { index, task } => {
                let mut tasks = self.tasks.clone();
                let index = (*index).min(tasks.len());
                tasks.insert(index, task.clone());
                Self { tasks }
            }
            Mutation::SetColumn { id, column } => Self {
                tasks: self
                    .tasks
                    .iter()
                    .map(|t| {
                        if t.id == *id {
                            let mut moved = t.clone();
                            moved.column = *column;
                            moved
                        } else {
                            t.clone()
                        }
                    })
                    .collect(),
            },
            Mutation::ReplaceId { from, to } => Self {
                tasks: self
                    .tasks
                    .iter()
                    .map(|t| {
                        if t.id == *from {
                            let mut renamed = t.clone();
                            renamed.id = *to;
                            renamed
                        } else {
                            t.clone()
                        }
                    })
                    .collect(),
            },
            Mutation::Remove(id) => Self {
                tasks: self
                    .tasks
                    .iter()
                    .filter(|t| t.id != *id)
                    .cloned()
                    .collect(),
            },
            Mutation::Replace(state) => state.clone(),
        }
    }
}
