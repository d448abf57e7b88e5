//! Trailing-edge debounce on the local task set.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::JoinHandle;

struct Scheduled {
    handle: JoinHandle<()>,
    /// Set once the quiet period elapsed and the action began running
    fired: Rc<Cell<bool>>,
}

/// Coalesces bursts of triggers into one deferred action.
///
/// Must be used from within a `tokio::task::LocalSet`.
#[derive(Default)]
pub struct Debouncer {
    pending: Option<Scheduled>,
    /// Actions whose timer elapsed; they run to completion
    started: Vec<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` once `delay` passes without another call to `schedule`.
    ///
    /// A still-waiting action from an earlier call is dropped without running.
    pub fn schedule<F>(&mut self, action: F, delay: Duration)
    where
        F: Future<Output = ()> + 'static,
    {
        self.cancel();

        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            flag.set(true);
            action.await;
        });

        self.pending = Some(Scheduled { handle, fired });
    }

    /// Drop the pending action if its timer has not elapsed yet.
    ///
    /// Returns true if an action was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.started.retain(|handle| !handle.is_finished());

        match self.pending.take() {
            Some(scheduled) if !scheduled.fired.get() => {
                scheduled.handle.abort();
                true
            }
            Some(scheduled) => {
                self.started.push(scheduled.handle);
                false
            }
            None => false,
        }
    }

    /// Whether an action is waiting for its quiet period to end.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|scheduled| !scheduled.fired.get())
    }

    /// Wait for the pending action (if any) and every started action to finish.
    pub async fn settle(&mut self) {
        if let Some(scheduled) = self.pending.take() {
            let _ = scheduled.handle.await;
        }
        for handle in self.started.drain(..) {
            let _ = handle.await;
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
