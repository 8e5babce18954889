//! # Typed notification sinks.
//!
//! Provides [`Sinks`] the per-queue set of optional callbacks that receive task
//! outcomes. At most one handler exists per event kind; a missing handler is
//! skipped silently.
//!
//! ## Delivery
//! ```text
//! report(outcome)
//!     ├─ Ok(output) ──► on_success(&output)
//!     ├─ Err(error) ──► on_failure(&error)
//!     └─ always     ──► on_done(&outcome)
//!
//! drain()         ──► on_drain()
//! ```
//!
//! ## Rules
//! - All handlers run on the queue's dispatcher task, one at a time, in outcome order.
//! - Handlers must not block; they delay every later dispatch step.
//! - A panicking handler is caught and logged; later notifications still fire.
//! - Calling [`Queue::add`](crate::Queue::add) from a handler is allowed: the new task is
//!   processed after the current step finishes.
//! - Capture a [`WeakQueue`](crate::WeakQueue) for that, not a `Queue` clone: the
//!   dispatcher owns its sinks, so a strong handle inside one keeps it running forever.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a handler uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::error;

use crate::error::panic_message;
use crate::tasks::{ErrorOf, Execute, TaskResult};

type SuccessFn<X> = Arc<dyn Fn(&<X as Execute>::Output) + Send + Sync>;
type FailureFn<X> = Arc<dyn Fn(&ErrorOf<X>) + Send + Sync>;
type DoneFn<X> = Arc<dyn Fn(&TaskResult<X>) + Send + Sync>;
type DrainFn = Arc<dyn Fn() + Send + Sync>;

/// Optional notification handlers held by a queue.
pub struct Sinks<X: Execute> {
    success: Option<SuccessFn<X>>,
    failure: Option<FailureFn<X>>,
    done: Option<DoneFn<X>>,
    drain: Option<DrainFn>,
}

impl<X: Execute> Sinks<X> {
    /// Creates an empty set (every notification is skipped).
    #[must_use]
    pub fn new() -> Self {
        Self {
            success: None,
            failure: None,
            done: None,
            drain: None,
        }
    }

    /// Sets the handler called with the output of every successful task.
    pub fn with_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&X::Output) + Send + Sync + 'static,
    {
        self.success = Some(Arc::new(f));
        self
    }

    /// Sets the handler called with every failure (the error carries its task).
    pub fn with_failure<F>(mut self, f: F) -> Self
    where
        F: Fn(&ErrorOf<X>) + Send + Sync + 'static,
    {
        self.failure = Some(Arc::new(f));
        self
    }

    /// Sets the handler called once per task after success or failure.
    pub fn with_done<F>(mut self, f: F) -> Self
    where
        F: Fn(&TaskResult<X>) + Send + Sync + 'static,
    {
        self.done = Some(Arc::new(f));
        self
    }

    /// Sets the handler called each time the queue becomes idle.
    pub fn with_drain<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.drain = Some(Arc::new(f));
        self
    }

    /// Delivers one task outcome: success or failure first, then done.
    pub(crate) fn report(&self, outcome: &TaskResult<X>) {
        match outcome {
            Ok(output) => {
                if let Some(f) = &self.success {
                    guarded("success", || f(output));
                }
            }
            Err(err) => {
                if let Some(f) = &self.failure {
                    guarded("failure", || f(err));
                }
            }
        }
        if let Some(f) = &self.done {
            guarded("done", || f(outcome));
        }
    }

    /// Delivers the drain notification.
    pub(crate) fn drain(&self) {
        if let Some(f) = &self.drain {
            guarded("drain", || f());
        }
    }
}

/// Runs a handler, converting a panic into an error log.
fn guarded(sink: &'static str, f: impl FnOnce()) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
        error!(sink, panic = %panic_message(&*payload), "notification sink panicked");
    }
}

impl<X: Execute> Default for Sinks<X> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: Execute> Clone for Sinks<X> {
    fn clone(&self) -> Self {
        Self {
            success: self.success.clone(),
            failure: self.failure.clone(),
            done: self.done.clone(),
            drain: self.drain.clone(),
        }
    }
}

impl<X: Execute> fmt::Debug for Sinks<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sinks")
            .field("success", &self.success.is_some())
            .field("failure", &self.failure.is_some())
            .field("done", &self.done.is_some())
            .field("drain", &self.drain.is_some())
            .finish()
    }
}
