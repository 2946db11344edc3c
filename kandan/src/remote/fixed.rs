//! Deterministic in-process remote for tests.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::{RemoteCall, RemoteOperationFailed};

/// The outcome a [`FixedRemote`] should settle with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Resolve successfully.
    Succeed,
    /// Reject with [`RemoteOperationFailed`].
    Fail,
}

/// A scripted remote that settles immediately with predetermined outcomes.
///
/// Outcomes are consumed front to back; once the script is exhausted, the
/// remote keeps settling with its fallback outcome. Also records the action
/// labels it was invoked with, so tests can assert the dispatcher's wiring.
#[derive(Debug)]
pub struct FixedRemote {
    script: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    invocations: Mutex<Vec<String>>,
}

impl FixedRemote {
    /// A remote that always resolves.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::with_fallback(Outcome::Succeed)
    }

    /// A remote that always rejects.
    #[must_use]
    pub fn failing() -> Self {
        Self::with_fallback(Outcome::Fail)
    }

    /// A remote that plays the given outcomes in order, then falls back to
    /// succeeding.
    #[must_use]
    pub fn scripted(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        let remote = Self::with_fallback(Outcome::Succeed);
        remote.script.lock().extend(outcomes);
        remote
    }

    fn with_fallback(fallback: Outcome) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Action labels seen so far, in invocation order.
    #[must_use]
    pub fn invocations(&self) -> Vec<String> {
        self.invocations.lock().clone()
    }

    fn next_outcome(&self) -> Outcome {
        self.script.lock().pop_front().unwrap_or(self.fallback)
    }
}

impl RemoteCall for FixedRemote {
    async fn invoke(&self, action: &str) -> Result<(), RemoteOperationFailed> {
        self.invocations.lock().push(action.to_string());
        // Yield once so concurrent dispatches interleave the way a real
        // delay would, without making tests time-dependent.
        tokio::task::yield_now().await;
        match self.next_outcome() {
            Outcome::Succeed => Ok(()),
            Outcome::Fail => Err(RemoteOperationFailed::new(action)),
        }
    }
}
