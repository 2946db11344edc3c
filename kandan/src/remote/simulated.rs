//! Simulated backend with randomized latency and failure.

use std::time::Duration;

use rand::Rng;

use super::{RemoteCall, RemoteOperationFailed};

/// A stand-in backend: sleeps for a uniformly random delay inside a
/// configured window, then fails with a configured probability,
/// independent of the action label.
#[derive(Debug, Clone)]
pub struct SimulatedRemote {
    /// Probability in `[0, 1]` that an invocation rejects.
    failure_probability: f64,
    /// Lower bound of the latency window.
    min_delay: Duration,
    /// Upper bound of the latency window.
    max_delay: Duration,
}

impl SimulatedRemote {
    /// Creates a simulated remote with the given failure probability and
    /// latency window. `max_delay` below `min_delay` is treated as equal
    /// to `min_delay`.
    #[must_use]
    pub fn new(failure_probability: f64, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            failure_probability: failure_probability.clamp(0.0, 1.0),
            min_delay,
            max_delay: max_delay.max(min_delay),
        }
    }

    /// Picks a delay uniformly from the configured window.
    fn pick_delay(&self) -> Duration {
        if self.min_delay == self.max_delay {
            return self.min_delay;
        }
        rand::rng().random_range(self.min_delay..=self.max_delay)
    }

    /// Rolls the failure die.
    fn rolls_failure(&self) -> bool {
        rand::rng().random::<f64>() < self.failure_probability
    }
}

impl Default for SimulatedRemote {
    /// The original stand-in contract: 1–2 s latency, 20% failure.
    fn default() -> Self {
        Self::new(
            0.2,
            Duration::from_millis(1000),
            Duration::from_millis(2000),
        )
    }
}

impl RemoteCall for SimulatedRemote {
    async fn invoke(&self, action: &str) -> Result<(), RemoteOperationFailed> {
        let delay = self.pick_delay();
        tracing::debug!(action, delay_ms = delay.as_millis() as u64, "remote call started");
        tokio::time::sleep(delay).await;

        if self.rolls_failure() {
            let err = RemoteOperationFailed::new(action);
            tracing::debug!(action, "remote call rejected");
            return Err(err);
        }
        tracing::debug!(action, "remote call resolved");
        Ok(())
    }
}
