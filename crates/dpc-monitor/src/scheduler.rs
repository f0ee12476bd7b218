//! # Periodic Driver Contract
//!
//! The monitor performs no threading of its own. Hosts drive `run_cycle`
//! through a [`Scheduler`], which runs a task at a fixed interval until the
//! returned [`CancellationToken`] is cancelled. Each cycle is a single
//! synchronous step, so cancellation never leaves a cycle half applied.
//!
//! [`ManualScheduler`] advances only when told to, for tests and for hosts
//! that own their own loop. Runtime-backed schedulers live in the host.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// A periodic task.
pub type ScheduledTask = Box<dyn FnMut() + Send + 'static>;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop further runs. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether `cancel` has been called on this token or a clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs a task every `interval` until cancelled.
pub trait Scheduler {
    /// Register a periodic task.
    fn schedule(&self, interval: Duration, task: ScheduledTask) -> CancellationToken;
}

struct Entry {
    interval: Duration,
    token: CancellationToken,
    task: ScheduledTask,
}

/// Deterministic scheduler that runs registered tasks on `tick`.
#[derive(Default)]
pub struct ManualScheduler {
    entries: Mutex<Vec<Entry>>,
}

impl ManualScheduler {
    /// An empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every live task once. Cancelled tasks are dropped before running.
    /// Returns how many tasks ran.
    pub fn tick(&self) -> usize {
        let mut entries = std::mem::take(&mut *self.entries.lock());
        entries.retain(|e| !e.token.is_cancelled());
        let mut ran = 0;
        for entry in entries.iter_mut() {
            // A task may cancel a later one mid-tick.
            if entry.token.is_cancelled() {
                continue;
            }
            (entry.task)();
            ran += 1;
        }
        let mut slot = self.entries.lock();
        // Tasks registered during the tick go after the existing ones.
        entries.append(&mut slot);
        *slot = entries;
        ran
    }

    /// Tick `n` times, returning the total task runs.
    pub fn run_ticks(&self, n: usize) -> usize {
        (0..n).map(|_| self.tick()).sum()
    }

    /// Registered tasks that are not cancelled.
    pub fn active_tasks(&self) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|e| !e.token.is_cancelled())
            .count()
    }

    /// Interval each live task was registered with.
    pub fn intervals(&self) -> Vec<Duration> {
        self.entries
            .lock()
            .iter()
            .filter(|e| !e.token.is_cancelled())
            .map(|e| e.interval)
            .collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, interval: Duration, task: ScheduledTask) -> CancellationToken {
        let token = CancellationToken::new();
        self.entries.lock().push(Entry {
            interval,
            token: token.clone(),
            task,
        });
        token
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("tasks", &self.entries.lock().len())
            .finish()
    }
}
