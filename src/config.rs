//! # Queue configuration.
//!
//! Provides [`QueueConfig`] the settings fixed at queue construction.
//!
//! ## Sentinel values
//! - `concurrency = 0` → treated as `1` (at least one slot always exists)
//! - `wait = 0s` → unbounded waiting time
//! - `timeout = 0s` → unbounded execution time

use std::time::Duration;

/// Configuration for a [`Queue`](crate::Queue).
///
/// ## Field semantics
/// - `concurrency`: maximum number of simultaneously executing tasks (`0` = `1`)
/// - `wait`: how long a task may sit in the waiting store before it is failed (`0s` = unbounded)
/// - `timeout`: how long an admitted task may run before it is failed (`0s` = unbounded)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the accessors over reading the
/// fields directly, they resolve the sentinels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum number of tasks executing at the same time.
    pub concurrency: usize,

    /// Maximum time a task may wait for a free slot.
    ///
    /// Checked lazily: only when a slot frees and the task reaches the front
    /// of the waiting store. A stale task is failed without being executed.
    pub wait: Duration,

    /// Maximum time an admitted task may run.
    ///
    /// When exceeded the task is reported as timed out and its slot is freed.
    /// The underlying operation is **not** aborted, its late result is discarded.
    pub timeout: Duration,
}

impl QueueConfig {
    /// Returns the number of slots (never less than 1).
    #[inline]
    pub fn concurrency_limit(&self) -> usize {
        self.concurrency.max(1)
    }

    /// Returns the waiting limit as an `Option`.
    ///
    /// - `None` → tasks may wait forever
    /// - `Some(d)` → tasks waiting longer than `d` are failed on dequeue
    #[inline]
    pub fn wait_limit(&self) -> Option<Duration> {
        if self.wait == Duration::ZERO {
            None
        } else {
            Some(self.wait)
        }
    }

    /// Returns the execution limit as an `Option`.
    ///
    /// - `None` → no execution timer is started
    /// - `Some(d)` → execution races a timer of `d`
    #[inline]
    pub fn execution_limit(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Returns a config with the given concurrency.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Returns a config with the given waiting limit (`0s` = unbounded).
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Returns a config with the given execution limit (`0s` = unbounded).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for QueueConfig {
    /// Default configuration:
    ///
    /// - `concurrency = 1` (strictly sequential)
    /// - `wait = 0s` (unbounded)
    /// - `timeout = 0s` (unbounded)
    fn default() -> Self {
        Self {
            concurrency: 1,
            wait: Duration::ZERO,
            timeout: Duration::ZERO,
        }
    }
}
