//! Membership set of task ids awaiting remote settlement.

use std::collections::HashSet;

use kandan_core::TaskId;

/// Tracks which task ids have an outstanding remote operation.
///
/// An id enters when its action's optimistic mutation is applied and leaves
/// exactly once when the action settles. While an id is a member, the
/// dispatcher rejects further mutating actions targeting it.
#[derive(Debug, Default)]
pub struct PendingSet {
    ids: HashSet<TaskId>,
}

impl PendingSet {
    /// Creates an empty pending set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an id as awaiting settlement.
    ///
    /// Marking an id that is already pending indicates a dispatcher bug:
    /// the busy check must run before the optimistic mutation.
    pub fn mark(&mut self, id: TaskId) {
        let inserted = self.ids.insert(id);
        debug_assert!(inserted, "task {id} was already pending");
    }

    /// Clears an id once its action settles. Returns whether it was present.
    pub fn clear(&mut self, id: TaskId) -> bool {
        self.ids.remove(&id)
    }

    /// Whether the id has an outstanding remote operation.
    #[must_use]
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of ids awaiting settlement.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is awaiting settlement.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Snapshot of the pending ids, for display surfaces.
    #[must_use]
    pub fn ids(&self) -> Vec<TaskId> {
        self.ids.iter().copied().collect()
    }
}
