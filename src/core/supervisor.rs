//! # Execution supervisor: one admitted task, one outcome.
//!
//! Drives a task through [`Execute::execute`] and, when an execution limit is
//! configured, races it against a timer.
//!
//! ## Flow
//! ```text
//! supervise(seq, task)
//!   └─► driver task
//!         ├─► spawn execution ──► execute(task) ──► settle(Ok | Execution | Panicked)
//!         ├─► spawn timer     ──► sleep_until(admitted + limit) ──► settle(ExecutionTimeout)
//!         │                   └─► disarmed when the execution settles first
//!         └─► await winner ──► Command::Settled { seq, outcome } ──► dispatcher
//! ```
//!
//! ## Rules
//! - Exactly **one** outcome per task reaches the dispatcher ([`Resolution`]).
//! - A timed-out execution is **not** aborted; it keeps running and its result is dropped.
//! - A panic inside `execute` is caught and reported as [`QueueError::Panicked`].
//! - The execution limit is measured from admission, not from when the timer task first runs.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::{select, sync::mpsc, time, time::Instant};
use tracing::{error, trace, warn};

use super::queue::Command;
use super::resolution::Resolution;
use crate::error::{QueueError, panic_message};
use crate::tasks::{Execute, TaskResult};

/// Spawns and supervises executions on behalf of the dispatcher.
pub(crate) struct ExecutionSupervisor<X: Execute> {
    executor: Arc<X>,
    limit: Option<Duration>,
    tx: mpsc::UnboundedSender<Command<X>>,
}

impl<X: Execute> ExecutionSupervisor<X> {
    pub fn new(
        executor: Arc<X>,
        limit: Option<Duration>,
        tx: mpsc::UnboundedSender<Command<X>>,
    ) -> Self {
        Self {
            executor,
            limit,
            tx,
        }
    }

    /// Starts `task` in a slot the dispatcher already reserved.
    ///
    /// Returns immediately; the outcome arrives later as [`Command::Settled`].
    pub fn supervise(&self, seq: u64, task: X::Task) {
        let executor = Arc::clone(&self.executor);
        let deadline = self.limit.map(|limit| (limit, Instant::now() + limit));
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let (resolution, winner) = Resolution::new();
            let resolution = Arc::new(resolution);

            if let Some((limit, deadline)) = deadline {
                spawn_timer::<X>(seq, limit, deadline, task.clone(), Arc::clone(&resolution));
            }
            spawn_execution(seq, executor, task.clone(), resolution);

            let outcome = match winner.await {
                Ok(outcome) => outcome,
                Err(_) => {
                    error!(seq, "execution dropped without an outcome");
                    Err(QueueError::Panicked {
                        task,
                        message: "execution dropped without an outcome".to_string(),
                    })
                }
            };
            let _ = tx.send(Command::Settled { seq, outcome });
        });
    }
}

/// Runs the operation and offers its outcome.
fn spawn_execution<X: Execute>(
    seq: u64,
    executor: Arc<X>,
    task: X::Task,
    resolution: Arc<Resolution<TaskResult<X>>>,
) {
    tokio::spawn(async move {
        let fut = executor.execute(task.clone());
        let outcome = match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(error)) => Err(QueueError::Execution { task, error }),
            Err(payload) => {
                let message = panic_message(&*payload);
                error!(seq, panic = %message, "execution panicked");
                Err(QueueError::Panicked { task, message })
            }
        };
        if !resolution.settle(outcome) {
            trace!(seq, "late execution result discarded");
        }
    });
}

/// Offers an execution timeout at `deadline` unless disarmed first.
fn spawn_timer<X: Execute>(
    seq: u64,
    limit: Duration,
    deadline: Instant,
    task: X::Task,
    resolution: Arc<Resolution<TaskResult<X>>>,
) {
    let disarm = resolution.timer_token();
    tokio::spawn(async move {
        select! {
            _ = time::sleep_until(deadline) => {
                if resolution.settle(Err(QueueError::ExecutionTimeout { task, timeout: limit })) {
                    warn!(seq, timeout = ?limit, "execution timed out");
                }
            }
            _ = disarm.cancelled() => {}
        }
    });
}
