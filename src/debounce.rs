//! Cancellable trailing-edge debounce timer.
//!
//! `schedule` (re)arms the timer; only the last callback scheduled inside a quiet
//! window runs. The callback runs synchronously when the timer fires, so anything it
//! spawns outlives a later `cancel`: cancelling only ever stops a timer that has not
//! fired yet.

use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct DebounceTimer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel whatever is pending and arm a new timer that calls `on_fire` after the
    /// quiet period. Must be called from inside a Tokio runtime.
    pub fn schedule<F>(&mut self, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel() {
            tracing::debug!(delay_ms = self.delay.as_millis() as u64, "debounce restarted");
        }
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire();
        }));
    }

    /// Stop the pending timer. Idempotent; returns whether a not-yet-fired timer was
    /// actually stopped.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// True while a timer is armed and has not fired.
    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
