//! `Kandan` domain model — tasks, columns, and the pure board state container.
//!
//! This crate holds no I/O and no async: the board is a value, and every
//! mutation is a pure function from one board value to the next. The
//! application crate owns the single mutable copy and decides when
//! transitions happen.

pub mod store;
pub mod task;

pub use store::{BoardState, Mutation};
pub use task::{Column, MAX_TASK_TITLE_LENGTH, ParseColumnError, Task, TaskId};
