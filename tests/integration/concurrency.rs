//! Concurrent in-flight actions on independent tasks.
//!
//! Snapshots and pending markers are per-action: actions on different
//! tasks may overlap freely and settle in any order, while a second
//! action on the same task is rejected until the first settles.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use kandan::board::{BoardError, BoardManager, Settlement};
use kandan::remote::fixed::Outcome;
use kandan::remote::{FixedRemote, RemoteCall, RemoteOperationFailed, SimulatedRemote};
use kandan_core::{BoardState, Column, Task, TaskId};

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

/// A remote that waits for an explicit release before settling, so tests
/// can hold actions in flight deliberately. Clones share the same gate.
#[derive(Clone)]
struct GatedRemote {
    gate: Arc<tokio::sync::Semaphore>,
    outcome: Outcome,
}

impl GatedRemote {
    fn new(outcome: Outcome) -> Self {
        Self {
            gate: Arc::new(tokio::sync::Semaphore::new(0)),
            outcome,
        }
    }

    fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }
}

impl RemoteCall for GatedRemote {
    async fn invoke(&self, action: &str) -> Result<(), RemoteOperationFailed> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| RemoteOperationFailed::new(action))?;
        permit.forget();
        match self.outcome {
            Outcome::Succeed => Ok(()),
            Outcome::Fail => Err(RemoteOperationFailed::new(action)),
        }
    }
}

#[tokio::test]
async fn independent_actions_settle_without_interference() {
    // One move fails while a delete on another task succeeds; each
    // rollback touches only its own task.
    let initial = board_of(&[
        ("A", Column::Todo),
        ("B", Column::Progress),
        ("C", Column::Done),
    ]);
    let remote = FixedRemote::scripted([Outcome::Fail, Outcome::Succeed]);
    let (manager, _rx) = BoardManager::new(initial, remote, 64);
    let a = manager.state().tasks()[0].id;
    let c = manager.state().tasks()[2].id;

    let (moved, deleted) = tokio::join!(
        manager.move_task(a, Column::Done),
        manager.delete_task(c)
    );

    assert!(matches!(moved.unwrap(), Settlement::RolledBack { .. }));
    assert_eq!(deleted.unwrap(), Settlement::Committed { id: c });

    let state = manager.state();
    assert_eq!(state.get(a).map(|t| t.column), Some(Column::Todo));
    assert!(!state.contains(c));
    assert_eq!(state.len(), 2);
    assert!(manager.pending_ids().is_empty());
    assert_eq!(manager.outstanding_snapshots(), 0);
}

#[tokio::test]
async fn pending_task_rejects_second_action_until_settled() {
    let initial = board_of(&[("A", Column::Todo)]);
    let remote = GatedRemote::new(Outcome::Succeed);
    let manager = {
        let (manager, _rx) = BoardManager::new(initial, remote.clone(), 64);
        Arc::new(manager)
    };
    let id = manager.state().tasks()[0].id;

    let mover = Arc::clone(&manager);
    let in_flight = tokio::spawn(async move { mover.move_task(id, Column::Progress).await });

    // Wait until the optimistic move landed and the task is pending.
    while !manager.is_pending(id) {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert_eq!(
        manager.delete_task(id).await.unwrap_err(),
        BoardError::TaskBusy(id)
    );
    assert_eq!(
        manager.move_task(id, Column::Done).await.unwrap_err(),
        BoardError::TaskBusy(id)
    );

    remote.release(1);
    let settled = in_flight.await.unwrap().unwrap();
    assert_eq!(settled, Settlement::Committed { id });

    // Once settled, the task accepts actions again.
    remote.release(1);
    assert_eq!(
        manager.delete_task(id).await.unwrap(),
        Settlement::Committed { id }
    );
}

#[tokio::test]
async fn many_overlapping_creates_each_settle_once() {
    let remote = GatedRemote::new(Outcome::Succeed);
    let manager = {
        let (manager, _rx) = BoardManager::new(BoardState::new(), remote.clone(), 256);
        Arc::new(manager)
    };

    let mut handles = Vec::new();
    for i in 0..10 {
        let m = Arc::clone(&manager);
        handles.push(tokio::spawn(async move {
            m.create_task(&format!("task {i}"), "").await
        }));
    }

    // All ten are optimistically inserted and pending before any settles.
    while manager.pending_ids().len() < 10 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert_eq!(manager.state().len(), 10);
    assert_eq!(manager.outstanding_snapshots(), 10);

    remote.release(10);
    for handle in handles {
        let settlement = handle.await.unwrap().unwrap();
        assert!(matches!(settlement, Settlement::Committed { .. }));
    }

    assert_eq!(manager.state().len(), 10);
    assert!(manager.pending_ids().is_empty());
    assert_eq!(manager.outstanding_snapshots(), 0);
}

#[tokio::test]
async fn randomized_remote_always_returns_to_consistency() {
    // Drive the real simulated remote (zero delay, mixed outcomes are
    // random) and check the invariant that matters: after every
    // settlement the board holds no pending ids and no snapshots.
    let initial = board_of(&[("A", Column::Todo), ("B", Column::Progress)]);
    let remote = SimulatedRemote::new(0.5, Duration::ZERO, Duration::ZERO);
    let (manager, _rx) = BoardManager::new(initial, remote, 256);
    let a = manager.state().tasks()[0].id;
    let b = manager.state().tasks()[1].id;

    for _ in 0..20 {
        let _ = manager.move_task(a, Column::Done).await;
        let _ = manager.move_task(a, Column::Todo).await;
        let _ = manager.move_task(b, Column::Todo).await;
        let _ = manager.move_task(b, Column::Progress).await;
        assert!(manager.pending_ids().is_empty());
        assert_eq!(manager.outstanding_snapshots(), 0);
        assert_eq!(manager.state().len(), 2);
    }
}
