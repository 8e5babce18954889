//! # Logging sink preset
//!
//! [`Sinks::logging`] fills every handler with a `tracing` event.
//! Use it for debugging or demos.
//!
//! ## Example output (with `tracing-subscriber` fmt layer)
//! ```text
//! INFO slotqueue::sinks::log: task succeeded output=Job { name: "Task0" }
//! WARN slotqueue::sinks::log: task failed kind="wait_timeout" task=Job { name: "Task7" } error=waiting timed out after 5.2s (limit 5s)
//! INFO slotqueue::sinks::log: queue drained
//! ```

use std::fmt::Debug;

use tracing::{debug, info, warn};

use crate::sinks::Sinks;
use crate::tasks::{ErrorOf, Execute, TaskResult};

impl<X: Execute> Sinks<X>
where
    X::Output: Debug,
{
    /// Returns a set where every notification is logged through `tracing`.
    ///
    /// Successes and drains log at `INFO`, failures at `WARN`, done at `DEBUG`.
    #[must_use]
    pub fn logging() -> Self {
        Sinks::new()
            .with_success(|output: &X::Output| info!(?output, "task succeeded"))
            .with_failure(|err: &ErrorOf<X>| {
                warn!(kind = err.as_label(), task = ?err.task(), error = %err, "task failed")
            })
            .with_done(|outcome: &TaskResult<X>| debug!(ok = outcome.is_ok(), "task done"))
            .with_drain(|| info!("queue drained"))
    }
}
