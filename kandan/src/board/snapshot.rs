//! Per-action snapshots for rollback on remote failure.
//!
//! Every mutating action captures a [`Snapshot`] of the state it destroys
//! *before* applying its optimistic mutation, keyed by an opaque
//! [`SnapshotToken`]. Tokens are redeemed exactly once at settlement:
//! rollback paths redeem and apply the inverse, success paths discard.
//! Each in-flight action holds its own token, so concurrent actions on
//! different tasks cannot clobber one another's rollback data.

use std::collections::HashMap;

use kandan_core::{Column, Task, TaskId};

/// What a rollback must restore for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// A create: the task did not exist before, so rollback removes it.
    Absent {
        /// The provisional id inserted optimistically.
        id: TaskId,
    },
    /// A move: rollback puts the task back in its prior column.
    PriorColumn {
        /// The moved task.
        id: TaskId,
        /// Column before the optimistic move.
        column: Column,
    },
    /// A delete: rollback re-inserts the task at its original index.
    Removed {
        /// The full task as it was before removal.
        task: Task,
        /// Its index in board order before removal.
        index: usize,
    },
}

/// Opaque handle to one captured snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotToken(u64);

/// Holds captured snapshots until their actions settle.
#[derive(Debug, Default)]
pub struct SnapshotLedger {
    next: u64,
    slots: HashMap<u64, Snapshot>,
}

impl SnapshotLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a snapshot, returning the token that redeems it.
    pub fn capture(&mut self, snapshot: Snapshot) -> SnapshotToken {
        let token = SnapshotToken(self.next);
        self.next += 1;
        self.slots.insert(token.0, snapshot);
        token
    }

    /// Takes the snapshot out of the ledger for rollback.
    ///
    /// Each token redeems at most once; a second redemption returns `None`,
    /// which is the runtime guard against settling the same action twice.
    pub fn redeem(&mut self, token: SnapshotToken) -> Option<Snapshot> {
        self.slots.remove(&token.0)
    }

    /// Drops the snapshot on a success path. Returns whether it was present.
    pub fn discard(&mut self, token: SnapshotToken) -> bool {
        self.slots.remove(&token.0).is_some()
    }

    /// Number of snapshots still awaiting settlement.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.slots.len()
    }
}
