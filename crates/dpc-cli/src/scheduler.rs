//! Tokio-backed [`Scheduler`] for periodic monitoring.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;

use dpc_monitor::{CancellationToken, ScheduledTask, Scheduler};

/// Runs each scheduled task on a tokio interval.
///
/// The first run happens one full interval after scheduling. Late ticks are
/// delayed rather than bunched, so a slow cycle never runs twice back to back.
/// A zero interval is refused: nothing is spawned and the returned token is
/// already cancelled.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Schedule onto the given runtime.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Schedule onto the runtime of the calling task.
    ///
    /// Panics outside a tokio runtime, like [`Handle::current`].
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, interval: Duration, mut task: ScheduledTask) -> CancellationToken {
        let token = CancellationToken::new();
        if interval.is_zero() {
            tracing::warn!("refusing to schedule a periodic task with a zero interval");
            token.cancel();
            return token;
        }
        let guard = token.clone();
        self.handle.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if guard.is_cancelled() {
                    break;
                }
                task();
            }
            tracing::debug!("periodic task cancelled");
        });
        token
    }
}
