//! Single-slot deferred task, used to debounce renders.
//!
//! [`DeferredTask`] holds at most one pending timer. Scheduling while a
//! timer is pending aborts it and starts a fresh one, so a burst of calls
//! fires once, one delay after the last call (debounce, not throttle).
//!
//! Every scheduled timer is stamped with a generation number. A timer that
//! had already fired and queued its notification before being replaced
//! carries an old generation; [`DeferredTask::complete`] rejects it, so the
//! owner acts only on the newest timer.

use std::time::Duration;

use tokio::task::JoinHandle;

/// A cancellable, reschedulable one-shot timer.
#[derive(Debug)]
pub struct DeferredTask {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl DeferredTask {
    /// Create an idle task that fires `delay` after each scheduling.
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    /// The quiet period before a scheduled task fires.
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `fire` to run after the delay, replacing any pending timer.
    ///
    /// `fire` receives the generation of this scheduling, which is also
    /// returned. Must be called within a Tokio runtime.
    pub fn schedule<F>(&mut self, fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);

        let generation = self.generation;
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(generation);
        }));
        generation
    }

    /// Abort the pending timer, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some_and(|handle| {
            handle.abort();
            true
        })
    }

    /// Whether a timer is scheduled and not yet completed.
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Acknowledge a fired timer.
    ///
    /// Returns `true` and clears the slot when `generation` is the newest
    /// scheduling; returns `false` for a stale timer.
    pub fn complete(&mut self, generation: u64) -> bool {
        if self.pending.is_none() || generation != self.generation {
            return false;
        }
        self.pending = None;
        true
    }
}

impl Drop for DeferredTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
