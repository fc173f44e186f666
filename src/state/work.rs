use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Outstanding work counter for a dynamically growing task graph
///
/// A [`WorkGuard`] is taken before each task is spawned and dropped when the
/// task finishes, on every exit path. [`WorkTracker::wait_drained`] resolves
/// once the count returns to zero.
#[derive(Debug, Default)]
pub struct WorkTracker {
    outstanding: AtomicUsize,
    drained: Notify,
}

impl WorkTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers one unit of scheduled work
    pub fn start(self: &Arc<Self>) -> WorkGuard {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        WorkGuard {
            tracker: Arc::clone(self),
        }
    }

    /// Number of tasks scheduled but not yet finished
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Waits until every registered unit of work has finished
    pub async fn wait_drained(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            // Register interest before reading the counter so a wakeup between
            // the check and the await is not lost.
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }

            notified.await;
        }
    }
}

/// Handle for one unit of outstanding work; finishing is dropping it
#[derive(Debug)]
pub struct WorkGuard {
    tracker: Arc<WorkTracker>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        if self.tracker.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.tracker.drained.notify_waiters();
        }
    }
}
