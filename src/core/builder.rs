//! # Queue builder.
//!
//! [`QueueBuilder`] collects a [`QueueConfig`] and [`Sinks`] around an executor,
//! then spawns the dispatcher on [`build`](QueueBuilder::build).
//!
//! ```text
//! Queue::builder(exec)
//!   ├─ .config(cfg) | .concurrency(n) | .wait(d) | .timeout(d)
//!   ├─ .sinks(set)  | .on_success(f)  | .on_failure(f) | .on_done(f) | .on_drain(f)
//!   └─ .build() ──► Queue (dispatcher spawned)
//! ```
//!
//! ## Rules
//! - Later setters override earlier ones; `.config(cfg)` replaces all three limits.
//! - `.sinks(set)` replaces every handler set so far; `on_*` replace one handler.
//! - `build()` must run inside a Tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use super::queue::Queue;
use crate::{
    config::QueueConfig,
    sinks::Sinks,
    tasks::{ErrorOf, Execute, TaskResult},
};

/// Builder for constructing a [`Queue`] with optional limits and sinks.
pub struct QueueBuilder<X: Execute> {
    config: QueueConfig,
    executor: Arc<X>,
    sinks: Sinks<X>,
}

impl<X: Execute> QueueBuilder<X> {
    /// Creates a new builder with default configuration and no sinks.
    pub fn new(executor: Arc<X>) -> Self {
        Self {
            config: QueueConfig::default(),
            executor,
            sinks: Sinks::new(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: QueueConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the number of slots (`0` is treated as `1`).
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Sets the waiting limit (`Duration::ZERO` = unbounded).
    pub fn wait(mut self, wait: Duration) -> Self {
        self.config.wait = wait;
        self
    }

    /// Sets the execution limit (`Duration::ZERO` = unbounded).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Replaces every sink at once.
    pub fn sinks(mut self, sinks: Sinks<X>) -> Self {
        self.sinks = sinks;
        self
    }

    /// Sets the success handler.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&X::Output) + Send + Sync + 'static,
    {
        self.sinks = self.sinks.with_success(f);
        self
    }

    /// Sets the failure handler.
    pub fn on_failure<F>(mut self, f: F) -> Self
    where
        F: Fn(&ErrorOf<X>) + Send + Sync + 'static,
    {
        self.sinks = self.sinks.with_failure(f);
        self
    }

    /// Sets the done handler.
    pub fn on_done<F>(mut self, f: F) -> Self
    where
        F: Fn(&TaskResult<X>) + Send + Sync + 'static,
    {
        self.sinks = self.sinks.with_done(f);
        self
    }

    /// Sets the drain handler.
    pub fn on_drain<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.sinks = self.sinks.with_drain(f);
        self
    }

    /// Builds the queue and spawns its dispatcher.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn build(self) -> Queue<X> {
        Queue::new(self.config, self.executor, self.sinks)
    }
}
