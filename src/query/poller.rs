//! Timed re-fetch while a snapshot condition holds.
//!
//! Two states: Idle (no task) and Polling (fixed-interval task). The task
//! belongs to the poller and dies with it, so no timer outlives the screen
//! that created it. A failed tick does not stop polling; only the
//! condition over the last successful snapshot does.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::query::tracked::TrackedQuery;

/// Fixed refresh cadence while the condition holds.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Drives periodic [`TrackedQuery::refresh`] while a predicate over the
/// snapshot data stays true.
pub struct Poller<T> {
    query: TrackedQuery<T>,
    condition: Arc<dyn Fn(&T) -> bool + Send + Sync>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + Sync + 'static> Poller<T> {
    pub fn new<F>(query: TrackedQuery<T>, condition: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            query,
            condition: Arc::new(condition),
            task: Mutex::new(None),
        }
    }

    /// Reconcile the timer with the current snapshot: start it when the
    /// condition holds and no task is running, stop it when the condition
    /// no longer holds. Call after every manual refresh.
    pub fn evaluate(&self) {
        let wants_polling = self.condition_holds();
        let mut task = self.task.lock();

        if let Some(handle) = task.as_ref() {
            if handle.is_finished() {
                *task = None;
            }
        }

        match (wants_polling, task.is_some()) {
            (true, false) => {
                tracing::debug!("Polling started");
                *task = Some(self.spawn_loop());
            }
            (false, true) => {
                tracing::debug!("Polling stopped");
                if let Some(handle) = task.take() {
                    handle.abort();
                }
            }
            _ => {}
        }
    }

    /// Whether the interval timer is currently active.
    pub fn is_polling(&self) -> bool {
        let mut task = self.task.lock();
        if let Some(handle) = task.as_ref() {
            if handle.is_finished() {
                *task = None;
            }
        }
        task.is_some()
    }

    /// Tear the timer down unconditionally.
    pub fn stop(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }

    fn condition_holds(&self) -> bool {
        let snapshot = self.query.snapshot();
        snapshot
            .data
            .as_deref()
            .map(|data| (self.condition)(data))
            .unwrap_or(false)
    }

    fn spawn_loop(&self) -> JoinHandle<()> {
        let query = self.query.clone();
        let condition = self.condition.clone();

        tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + POLL_INTERVAL, POLL_INTERVAL);
            loop {
                ticks.tick().await;
                // Same refresh as a manual one; errors keep the last good
                // snapshot and therefore keep the loop alive.
                query.refresh().await;
                let snapshot = query.snapshot();
                let keep_going = snapshot
                    .data
                    .as_deref()
                    .map(|data| condition(data))
                    .unwrap_or(false);
                if !keep_going {
                    tracing::debug!("Polling condition cleared");
                    break;
                }
            }
        })
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }
}
