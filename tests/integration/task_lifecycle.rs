//! End-to-end optimistic create/move/delete flows on the happy path.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use kandan::board::{BoardEvent, BoardManager, Settlement};
use kandan::notify::{ToastCenter, ToastKind};
use kandan::remote::FixedRemote;
use kandan_core::{BoardState, Column, Task, TaskId};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Builds a board from (title, column) pairs.
fn board_of(tasks: &[(&str, Column)]) -> BoardState {
    BoardState::from_tasks(
        tasks
            .iter()
            .map(|(title, column)| Task {
                id: TaskId::new(),
                title: (*title).to_string(),
                description: String::new(),
                column: *column,
                created_at: 1_000,
            })
            .collect(),
    )
}

/// Collects everything currently buffered on the event channel.
fn drain(rx: &mut mpsc::Receiver<BoardEvent>) -> Vec<BoardEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_on_empty_board_commits_with_final_id() {
    // Scenario: store = []; create "Buy milk"; remote succeeds.
    let (manager, mut rx) = BoardManager::new(BoardState::new(), FixedRemote::succeeding(), 64);

    let settlement = manager.create_task("Buy milk", "").await.unwrap();
    let Settlement::Committed { id } = settlement else {
        panic!("expected commit, got {settlement:?}");
    };

    let state = manager.state();
    assert_eq!(state.len(), 1);
    assert_eq!(state.tasks()[0].id, id);
    assert_eq!(state.tasks()[0].column, Column::Todo);
    assert!(manager.pending_ids().is_empty());
    assert_eq!(manager.outstanding_snapshots(), 0);

    // The provisional id from the optimistic insert is gone from the store.
    let events = drain(&mut rx);
    let BoardEvent::TaskAdded { id: provisional } = events[0] else {
        panic!("expected optimistic insert first, got {:?}", events[0]);
    };
    assert!(!state.contains(provisional));
    assert_ne!(provisional, id);
}

#[tokio::test]
async fn created_task_is_pending_until_settlement() {
    let (manager, mut rx) = BoardManager::new(BoardState::new(), FixedRemote::succeeding(), 64);

    // Run the dispatch and observe the pending marker through the event
    // emitted during the optimistic phase.
    let settlement = manager.create_task("Buy milk", "").await.unwrap();
    assert!(matches!(settlement, Settlement::Committed { .. }));

    let events = drain(&mut rx);
    assert!(matches!(events[0], BoardEvent::TaskAdded { .. }));
    assert!(matches!(events[1], BoardEvent::TaskConfirmed { .. }));
    // After settlement nothing is pending.
    assert!(manager.pending_ids().is_empty());
}

#[tokio::test]
async fn create_inserts_at_front() {
    let initial = board_of(&[("existing", Column::Todo)]);
    let (manager, _rx) = BoardManager::new(initial, FixedRemote::succeeding(), 64);

    manager.create_task("newest", "").await.unwrap();

    let state = manager.state();
    assert_eq!(state.tasks()[0].title, "newest");
    assert_eq!(state.tasks()[1].title, "existing");
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

#[tokio::test]
async fn move_commits_and_emits_no_success_toast() {
    let initial = board_of(&[("a", Column::Todo)]);
    let (manager, mut rx) = BoardManager::new(initial, FixedRemote::succeeding(), 64);
    let id = manager.state().tasks()[0].id;

    let settlement = manager.move_task(id, Column::Progress).await.unwrap();
    assert_eq!(settlement, Settlement::Committed { id });
    assert_eq!(
        manager.state().get(id).map(|t| t.column),
        Some(Column::Progress)
    );

    // Moves confirm silently; only failures toast.
    let events = drain(&mut rx);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, BoardEvent::Notice { .. }))
    );
    assert!(events.iter().any(|e| matches!(
        e,
        BoardEvent::TaskMoved {
            from: Column::Todo,
            to: Column::Progress,
            ..
        }
    )));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_commits_and_toasts_success() {
    let initial = board_of(&[("a", Column::Todo), ("b", Column::Done)]);
    let (manager, mut rx) = BoardManager::new(initial, FixedRemote::succeeding(), 64);
    let id = manager.state().tasks()[1].id;

    let settlement = manager.delete_task(id).await.unwrap();
    assert_eq!(settlement, Settlement::Committed { id });
    assert_eq!(manager.state().len(), 1);
    assert!(!manager.state().contains(id));

    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(
        e,
        BoardEvent::Notice { message, kind: ToastKind::Success }
            if message == "Task deleted successfully."
    )));
}

// ---------------------------------------------------------------------------
// Notices feed the toast center
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notices_flow_into_the_toast_center() {
    let (manager, mut rx) = BoardManager::new(BoardState::new(), FixedRemote::succeeding(), 64);
    let toasts = ToastCenter::default();

    manager.create_task("Buy milk", "").await.unwrap();
    for event in drain(&mut rx) {
        if let BoardEvent::Notice { message, kind } = event {
            toasts.push(message, kind);
        }
    }

    let active = toasts.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].message, "Task added.");
    assert_eq!(active[0].kind, ToastKind::Success);
}
