//! Property-based tests for the pure board store.
//!
//! Uses proptest to verify:
//! 1. `apply` never panics, whatever the mutation or board.
//! 2. Arbitrary mutation sequences keep the board structurally valid.
//! 3. `Replace` restores the exact prior task list.
//! 4. `Remove` followed by `InsertAt` at the captured index reproduces
//!    the original order.

use proptest::prelude::*;
use uuid::Uuid;

use kandan_core::{BoardState, Column, Mutation, Task, TaskId};

// --- Strategies for board types ---

/// Strategy for generating arbitrary `TaskId` values.
fn arb_task_id() -> impl Strategy<Value = TaskId> {
    any::<u128>().prop_map(|n| TaskId::from_uuid(Uuid::from_u128(n)))
}

/// Strategy for generating arbitrary `Column` values.
fn arb_column() -> impl Strategy<Value = Column> {
    prop_oneof![
        Just(Column::Todo),
        Just(Column::Progress),
        Just(Column::Done),
    ]
}

/// Strategy for generating arbitrary `Task` values.
fn arb_task() -> impl Strategy<Value = Task> {
    (arb_task_id(), ".{0,64}", ".{0,128}", arb_column(), any::<u64>()).prop_map(
        |(id, title, description, column, created_at)| Task {
            id,
            title,
            description,
            column,
            created_at,
        },
    )
}

/// Strategy for generating arbitrary boards of up to 16 tasks.
fn arb_board() -> impl Strategy<Value = BoardState> {
    prop::collection::vec(arb_task(), 0..16).prop_map(BoardState::from_tasks)
}

/// Strategy for generating a single arbitrary `Mutation`.
fn arb_mutation() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        arb_task().prop_map(Mutation::InsertFront),
        (any::<usize>(), arb_task()).prop_map(|(index, task)| Mutation::InsertAt { index, task }),
        (arb_task_id(), arb_column()).prop_map(|(id, column)| Mutation::SetColumn { id, column }),
        (arb_task_id(), arb_task_id()).prop_map(|(from, to)| Mutation::ReplaceId { from, to }),
        arb_task_id().prop_map(Mutation::Remove),
        arb_board().prop_map(Mutation::Replace),
    ]
}

// --- Property tests ---

proptest! {
    /// `apply` is total: no mutation panics, even with out-of-range
    /// indices or ids the board has never seen.
    #[test]
    fn apply_never_panics(board in arb_board(), mutation in arb_mutation()) {
        let _ = board.apply(&mutation);
    }

    /// A board stays structurally valid under any mutation sequence:
    /// every task still sits in one of the three columns and the column
    /// partition covers the whole list.
    #[test]
    fn mutation_sequences_keep_the_board_valid(
        board in arb_board(),
        mutations in prop::collection::vec(arb_mutation(), 0..32),
    ) {
        let mut state = board;
        for mutation in &mutations {
            state = state.apply(mutation);
        }
        let by_column: usize = Column::ALL
            .iter()
            .map(|&c| state.in_column(c).len())
            .sum();
        prop_assert_eq!(by_column, state.len());
        for task in state.tasks() {
            prop_assert!(Column::ALL.contains(&task.column));
        }
    }

    /// `Replace` discards whatever happened in between and restores the
    /// captured list exactly: same ids, same order, same fields.
    #[test]
    fn replace_restores_the_exact_prior_list(
        board in arb_board(),
        mutations in prop::collection::vec(arb_mutation(), 0..16),
    ) {
        let before = board.clone();
        let mut state = board;
        for mutation in &mutations {
            state = state.apply(mutation);
        }
        let restored = state.apply(&Mutation::Replace(before.clone()));
        prop_assert_eq!(restored, before);
    }

    /// Removing a task and reinserting it at its captured position is the
    /// identity, for any position in the board.
    #[test]
    fn remove_then_insert_at_captured_index_is_identity(
        mut tasks in prop::collection::vec(arb_task(), 1..16),
        pick in any::<prop::sample::Index>(),
    ) {
        // Duplicate ids would make position() ambiguous; make them unique.
        for (i, task) in tasks.iter_mut().enumerate() {
            task.id = TaskId::from_uuid(Uuid::from_u128(i as u128));
        }
        let board = BoardState::from_tasks(tasks);
        let victim = board.tasks()[pick.index(board.len())].clone();

        let index = board.position(victim.id).expect("picked from the board");
        let removed = board.apply(&Mutation::Remove(victim.id));
        prop_assert!(!removed.contains(victim.id));

        let restored = removed.apply(&Mutation::InsertAt { index, task: victim });
        prop_assert_eq!(restored, board);
    }

    /// `InsertFront` always lands the new task at index zero and leaves
    /// the rest of the list shifted but otherwise untouched.
    #[test]
    fn insert_front_prepends(board in arb_board(), task in arb_task()) {
        let before = board.clone();
        let after = board.apply(&Mutation::InsertFront(task.clone()));
        prop_assert_eq!(after.len(), before.len() + 1);
        prop_assert_eq!(&after.tasks()[0], &task);
        prop_assert_eq!(&after.tasks()[1..], before.tasks());
    }
}
