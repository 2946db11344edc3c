//! Remote-call abstraction for the board's backend.
//!
//! Defines the [`RemoteCall`] trait that the dispatcher settles actions
//! against. Concrete implementations:
//! - [`simulated::SimulatedRemote`] — randomized latency and failure, the
//!   stand-in backend the application runs against
//! - [`fixed::FixedRemote`] — deterministic scripted outcomes for tests

pub mod fixed;
pub mod simulated;

pub use fixed::FixedRemote;
pub use simulated::SimulatedRemote;

/// The single error kind a remote operation can settle with.
///
/// Carries the action label it was invoked with; the rendered message is
/// shown to the user verbatim in an error toast.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to {action}. Please try again.")]
pub struct RemoteOperationFailed {
    /// The action label passed to [`RemoteCall::invoke`].
    pub action: String,
}

impl RemoteOperationFailed {
    /// Creates a failure for the given action label.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }
}

/// Async collaborator contract for the (simulated) backend.
///
/// Given an action label, resolves successfully or rejects with
/// [`RemoteOperationFailed`] after a bounded delay. Once invoked, a call
/// always settles: there is no cancellation, timeout, or retry path.
pub trait RemoteCall: Send + Sync {
    /// Performs the remote operation described by `action`.
    fn invoke(
        &self,
        action: &str,
    ) -> impl std::future::Future<Output = Result<(), RemoteOperationFailed>> + Send;
}
