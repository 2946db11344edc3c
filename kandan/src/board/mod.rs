//! Board orchestration: optimistic mutation, settlement, and rollback.
//!
//! [`BoardManager`] is the single entry point for mutating the board and
//! the sole owner of its state. Every action runs the same lifecycle:
//! a synchronous begin phase validates the action, captures a rollback
//! snapshot, applies the optimistic mutation, and marks the task pending;
//! the dispatcher then awaits the remote collaborator and runs a
//! synchronous settle phase that commits or rolls back. The in-flight
//! record moves by value into settlement, so an action cannot settle twice.

pub mod pending;
pub mod seed;
pub mod snapshot;

pub use pending::PendingSet;
pub use snapshot::{Snapshot, SnapshotLedger, SnapshotToken};

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use tokio::sync::mpsc;

use kandan_core::{BoardState, Column, MAX_TASK_TITLE_LENGTH, Mutation, Task, TaskId};

use crate::notify::ToastKind;
use crate::remote::{RemoteCall, RemoteOperationFailed};

/// Errors that reject an action before any mutation is applied.
///
/// Remote failures are not errors at this boundary: they settle the action
/// as [`Settlement::RolledBack`] and surface through a [`BoardEvent::Notice`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Task title cannot be empty.
    #[error("task title cannot be empty")]
    TitleEmpty,
    /// Task title exceeds the maximum length.
    #[error("task title too long (max 256 characters)")]
    TitleTooLong,
    /// Task with the given ID was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The task already has a remote operation in flight.
    #[error("task {0} has an operation in flight")]
    TaskBusy(TaskId),
}

/// The three mutating action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Create a new task.
    AddTask,
    /// Move a task to another column.
    MoveTask,
    /// Delete a task.
    DeleteTask,
}

impl ActionKind {
    /// The action label passed to the remote collaborator.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AddTask => "add task",
            Self::MoveTask => "move task",
            Self::DeleteTask => "delete task",
        }
    }
}

/// Events emitted by the [`BoardManager`] for consuming surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// A task was inserted optimistically with a provisional id.
    TaskAdded {
        /// The provisional id.
        id: TaskId,
    },
    /// A create committed and its provisional id was reconciled.
    TaskConfirmed {
        /// The provisional id that was replaced.
        provisional: TaskId,
        /// The assigned id now in the store.
        assigned: TaskId,
    },
    /// A task was moved optimistically.
    TaskMoved {
        /// The moved task.
        id: TaskId,
        /// Column before the move.
        from: Column,
        /// Column after the move.
        to: Column,
    },
    /// A task was removed optimistically.
    TaskRemoved {
        /// The removed task.
        id: TaskId,
    },
    /// A failed action's optimistic mutation was undone.
    RolledBack {
        /// The affected task.
        id: TaskId,
        /// Which action kind rolled back.
        action: ActionKind,
    },
    /// A user-visible notification.
    Notice {
        /// Message to display.
        message: String,
        /// Success or error styling.
        kind: ToastKind,
    },
}

/// Terminal outcome of a dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The remote confirmed the action; the optimistic state stands.
    Committed {
        /// The settled task id (the assigned id for creates).
        id: TaskId,
    },
    /// The remote rejected the action; the optimistic mutation was undone.
    RolledBack {
        /// The user-facing failure message.
        message: String,
    },
    /// Nothing to do (same-column move, or a duplicate settlement).
    Unchanged,
}

/// One action between its optimistic apply and its settlement.
#[derive(Debug)]
struct InFlight {
    /// The task the action targets (the provisional id for creates).
    id: TaskId,
    kind: ActionKind,
    token: SnapshotToken,
}

/// State guarded by the manager's mutex.
#[derive(Debug)]
struct Inner {
    state: BoardState,
    pending: PendingSet,
    snapshots: SnapshotLedger,
}

/// Applies actions optimistically and settles them against a remote.
///
/// Mutation phases are synchronous critical sections; the only suspension
/// point is the awaited remote call, during which the affected task is
/// pending and locked against further mutating actions. Actions on
/// different tasks may be in flight concurrently.
pub struct BoardManager<R: RemoteCall> {
    remote: R,
    inner: Mutex<Inner>,
    event_tx: mpsc::Sender<BoardEvent>,
}

/// Current time in milliseconds since epoch.
fn now_ms() -> u64 {
    u64::try_from(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    )
    .unwrap_or(u64::MAX)
}

impl<R: RemoteCall> BoardManager<R> {
    /// Creates a manager owning `initial` and settling against `remote`.
    ///
    /// Returns the manager and a receiver for [`BoardEvent`]s that the
    /// consuming surface should drain.
    pub fn new(
        initial: BoardState,
        remote: R,
        event_buffer: usize,
    ) -> (Self, mpsc::Receiver<BoardEvent>) {
        let (event_tx, event_rx) = mpsc::channel(event_buffer);
        let manager = Self {
            remote,
            inner: Mutex::new(Inner {
                state: initial,
                pending: PendingSet::new(),
                snapshots: SnapshotLedger::new(),
            }),
            event_tx,
        };
        (manager, event_rx)
    }

    /// A consistent copy of the current board.
    #[must_use]
    pub fn state(&self) -> BoardState {
        self.inner.lock().state.clone()
    }

    /// Whether the task has a remote operation outstanding.
    #[must_use]
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.inner.lock().pending.is_pending(id)
    }

    /// Ids with outstanding remote operations.
    #[must_use]
    pub fn pending_ids(&self) -> Vec<TaskId> {
        self.inner.lock().pending.ids()
    }

    /// Number of rollback snapshots still held for in-flight actions.
    #[must_use]
    pub fn outstanding_snapshots(&self) -> usize {
        self.inner.lock().snapshots.outstanding()
    }

    /// Creates a task in the todo column and settles the creation.
    ///
    /// The task appears immediately under a provisional id; on success the
    /// id is reconciled to a freshly assigned one, on failure the task is
    /// removed again.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TitleEmpty`] or [`BoardError::TitleTooLong`]
    /// if the title fails validation.
    pub async fn create_task(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Settlement, BoardError> {
        let action = self.begin_create(title, description)?;
        let outcome = self.remote.invoke(action.kind.label()).await;
        Ok(self.settle(action, outcome))
    }

    /// Moves a task to another column and settles the move.
    ///
    /// Dropping a task on the column it is already in settles as
    /// [`Settlement::Unchanged`] without a remote call.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] for an unknown id or
    /// [`BoardError::TaskBusy`] while the task awaits another settlement.
    pub async fn move_task(&self, id: TaskId, to: Column) -> Result<Settlement, BoardError> {
        let Some(action) = self.begin_move(id, to)? else {
            return Ok(Settlement::Unchanged);
        };
        let outcome = self.remote.invoke(action.kind.label()).await;
        Ok(self.settle(action, outcome))
    }

    /// Deletes a task and settles the deletion.
    ///
    /// The task disappears immediately; on failure it is restored at its
    /// original position with identical fields.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] for an unknown id or
    /// [`BoardError::TaskBusy`] while the task awaits another settlement.
    pub async fn delete_task(&self, id: TaskId) -> Result<Settlement, BoardError> {
        let action = self.begin_delete(id)?;
        let outcome = self.remote.invoke(action.kind.label()).await;
        Ok(self.settle(action, outcome))
    }

    /// Validates and applies the optimistic insert for a create.
    fn begin_create(&self, title: &str, description: &str) -> Result<InFlight, BoardError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BoardError::TitleEmpty);
        }
        if title.chars().count() > MAX_TASK_TITLE_LENGTH {
            return Err(BoardError::TitleTooLong);
        }

        let task = Task {
            id: TaskId::new(),
            title: title.to_string(),
            description: description.trim().to_string(),
            column: Column::Todo,
            created_at: now_ms(),
        };
        let id = task.id;

        let mut inner = self.inner.lock();
        let token = inner.snapshots.capture(Snapshot::Absent { id });
        inner.state = inner.state.apply(&Mutation::InsertFront(task));
        inner.pending.mark(id);
        drop(inner);

        tracing::debug!(%id, "task inserted optimistically");
        self.emit(BoardEvent::TaskAdded { id });
        Ok(InFlight {
            id,
            kind: ActionKind::AddTask,
            token,
        })
    }

    /// Validates and applies the optimistic column change for a move.
    ///
    /// Returns `Ok(None)` when the task is already in the target column.
    fn begin_move(&self, id: TaskId, to: Column) -> Result<Option<InFlight>, BoardError> {
        let mut inner = self.inner.lock();
        let from = inner
            .state
            .get(id)
            .map(|t| t.column)
            .ok_or(BoardError::TaskNotFound(id))?;
        if inner.pending.is_pending(id) {
            return Err(BoardError::TaskBusy(id));
        }
        if from == to {
            return Ok(None);
        }

        let token = inner.snapshots.capture(Snapshot::PriorColumn { id, column: from });
        inner.state = inner.state.apply(&Mutation::SetColumn { id, column: to });
        inner.pending.mark(id);
        drop(inner);

        tracing::debug!(%id, %from, %to, "task moved optimistically");
        self.emit(BoardEvent::TaskMoved { id, from, to });
        Ok(Some(InFlight {
            id,
            kind: ActionKind::MoveTask,
            token,
        }))
    }

    /// Validates and applies the optimistic removal for a delete.
    fn begin_delete(&self, id: TaskId) -> Result<InFlight, BoardError> {
        let mut inner = self.inner.lock();
        let index = inner
            .state
            .position(id)
            .ok_or(BoardError::TaskNotFound(id))?;
        if inner.pending.is_pending(id) {
            return Err(BoardError::TaskBusy(id));
        }

        // The clone happens before the removal so the snapshot holds the
        // task exactly as it was.
        let task = inner.state.tasks()[index].clone();
        let token = inner.snapshots.capture(Snapshot::Removed { task, index });
        inner.state = inner.state.apply(&Mutation::Remove(id));
        inner.pending.mark(id);
        drop(inner);

        tracing::debug!(%id, index, "task removed optimistically");
        self.emit(BoardEvent::TaskRemoved { id });
        Ok(InFlight {
            id,
            kind: ActionKind::DeleteTask,
            token,
        })
    }

    /// Runs the terminal phase of an action's lifecycle.
    fn settle(
        &self,
        action: InFlight,
        outcome: Result<(), RemoteOperationFailed>,
    ) -> Settlement {
        match outcome {
            Ok(()) => self.commit(action),
            Err(err) => self.roll_back(action, &err),
        }
    }

    /// Confirms an optimistic mutation after remote success.
    fn commit(&self, action: InFlight) -> Settlement {
        let InFlight { id, kind, token } = action;
        let mut inner = self.inner.lock();
        if !inner.snapshots.discard(token) {
            tracing::warn!(%id, "duplicate settlement ignored");
            return Settlement::Unchanged;
        }
        inner.pending.clear(id);

        match kind {
            ActionKind::AddTask => {
                let assigned = TaskId::new();
                inner.state = inner.state.apply(&Mutation::ReplaceId { from: id, to: assigned });
                drop(inner);
                tracing::info!(provisional = %id, %assigned, "create committed");
                self.emit(BoardEvent::TaskConfirmed {
                    provisional: id,
                    assigned,
                });
                self.notice("Task added.", ToastKind::Success);
                Settlement::Committed { id: assigned }
            }
            ActionKind::MoveTask => {
                drop(inner);
                tracing::info!(%id, "move committed");
                Settlement::Committed { id }
            }
            ActionKind::DeleteTask => {
                drop(inner);
                tracing::info!(%id, "delete committed");
                self.notice("Task deleted successfully.", ToastKind::Success);
                Settlement::Committed { id }
            }
        }
    }

    /// Undoes an optimistic mutation after remote failure.
    fn roll_back(&self, action: InFlight, err: &RemoteOperationFailed) -> Settlement {
        let InFlight { id, kind, token } = action;
        let mut inner = self.inner.lock();
        let Some(snapshot) = inner.snapshots.redeem(token) else {
            tracing::warn!(%id, "duplicate settlement ignored");
            return Settlement::Unchanged;
        };
        inner.pending.clear(id);

        let inverse = match snapshot {
            Snapshot::Absent { id } => Mutation::Remove(id),
            Snapshot::PriorColumn { id, column } => Mutation::SetColumn { id, column },
            Snapshot::Removed { task, index } => Mutation::InsertAt { index, task },
        };
        inner.state = inner.state.apply(&inverse);
        drop(inner);

        let message = err.to_string();
        tracing::info!(%id, action = kind.label(), "optimistic mutation rolled back");
        self.emit(BoardEvent::RolledBack { id, action: kind });
        self.notice(message.clone(), ToastKind::Error);
        Settlement::RolledBack { message }
    }

    /// Emits a notification event.
    fn notice(&self, message: impl Into<String>, kind: ToastKind) {
        self.emit(BoardEvent::Notice {
            message: message.into(),
            kind,
        });
    }

    /// Non-blocking event emission; a full buffer drops the event.
    fn emit(&self, event: BoardEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            tracing::warn!("board event dropped: {e}");
        }
    }
}
