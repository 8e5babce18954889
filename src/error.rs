//! Error types reported by the queue.
//!
//! [`QueueError`] is the single terminal failure of a task. It is never returned
//! from [`Queue::add`](crate::Queue::add); it only reaches the caller through the
//! failure and done sinks.
//!
//! Every variant carries the task it belongs to, so a sink can tell which
//! submission failed without keeping its own bookkeeping.

use std::any::Any;
use std::time::Duration;
use thiserror::Error;

/// # Terminal failure of a queued task.
///
/// - `T`: the task payload type ([`Execute::Task`](crate::Execute::Task))
/// - `E`: the error type of the execution operation ([`Execute::Error`](crate::Execute::Error))
///
/// None of these are retried: the task is reported once and dropped.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum QueueError<T, E> {
    /// The execution operation itself failed; its error is kept verbatim.
    #[error("execution failed: {error}")]
    Execution {
        /// The task that was executed.
        task: T,
        /// The error returned by the operation.
        #[source]
        error: E,
    },

    /// Execution exceeded the configured execution limit.
    #[error("execution timed out after {timeout:?}")]
    ExecutionTimeout {
        /// The task whose execution was abandoned.
        task: T,
        /// The execution limit that was exceeded.
        timeout: Duration,
    },

    /// The task waited for a slot longer than the configured waiting limit.
    ///
    /// The execution operation was never invoked for this task.
    #[error("waiting timed out after {waited:?} (limit {limit:?})")]
    WaitTimeout {
        /// The task that was never executed.
        task: T,
        /// How long the task actually waited.
        waited: Duration,
        /// The waiting limit that was exceeded.
        limit: Duration,
    },

    /// The execution operation panicked.
    #[error("execution panicked: {message}")]
    Panicked {
        /// The task that was executed.
        task: T,
        /// Panic payload rendered as text.
        message: String,
    },
}

impl<T, E> QueueError<T, E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use slotqueue::QueueError;
    ///
    /// let err: QueueError<&str, std::io::Error> = QueueError::ExecutionTimeout {
    ///     task: "report",
    ///     timeout: Duration::from_secs(1),
    /// };
    /// assert_eq!(err.as_label(), "execution_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            QueueError::Execution { .. } => "execution_failed",
            QueueError::ExecutionTimeout { .. } => "execution_timeout",
            QueueError::WaitTimeout { .. } => "wait_timeout",
            QueueError::Panicked { .. } => "execution_panicked",
        }
    }

    /// Returns the task this failure belongs to.
    pub fn task(&self) -> &T {
        match self {
            QueueError::Execution { task, .. }
            | QueueError::ExecutionTimeout { task, .. }
            | QueueError::WaitTimeout { task, .. }
            | QueueError::Panicked { task, .. } => task,
        }
    }

    /// Consumes the error and returns the task.
    pub fn into_task(self) -> T {
        match self {
            QueueError::Execution { task, .. }
            | QueueError::ExecutionTimeout { task, .. }
            | QueueError::WaitTimeout { task, .. }
            | QueueError::Panicked { task, .. } => task,
        }
    }

    /// Indicates whether the failure was caused by one of the two time limits.
    ///
    /// Returns `true` for [`QueueError::ExecutionTimeout`] and
    /// [`QueueError::WaitTimeout`], `false` otherwise.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            QueueError::ExecutionTimeout { .. } | QueueError::WaitTimeout { .. }
        )
    }
}

/// Renders a panic payload caught by `catch_unwind`.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
