//! # Queue handle and dispatcher loop.
//!
//! [`Queue`] is a cheap, cloneable handle. All queue state lives in a single
//! dispatcher task that processes one [`Command`] at a time, so admission, slot
//! release, wait-timeout cascades and notifications never interleave.
//!
//! ## Architecture
//! ```text
//! Queue::add(task) ──► Command::Add ──┐
//!                                     ▼
//!                        ┌─────────────────────────┐
//!                        │ Dispatcher (one task)   │
//!                        │ - Admission (in_flight) │
//!                        │ - WaitingStore (FIFO)   │
//!                        │ - Sinks                 │
//!                        └────┬───────────────▲────┘
//!               slot free     │               │ Command::Settled
//!                             ▼               │
//!                    ExecutionSupervisor ─────┘
//!                   (execution ⟷ timer race)
//! ```
//!
//! ## Steps
//! - **Add**: free slot → admit and start; otherwise append to the waiting store.
//! - **Settled**: release the slot → report (success/failure, then done) →
//!   advance the waiting store → drain if nothing is in flight.
//! - **Advance**: pop entries in FIFO order; stale ones are reported as
//!   `WaitTimeout` without executing, until one is admitted or the store is empty.
//!
//! ## Lifetime
//! The dispatcher runs until every handle is dropped **and** the queue is idle:
//! tasks already submitted always reach an outcome.
//!
//! The dispatcher owns the sinks, so a strong [`Queue`] captured by a sink keeps
//! the dispatcher alive forever (`Dispatcher → Sinks → Queue`). Sinks that submit
//! follow-up work should capture a [`WeakQueue`] from [`Queue::downgrade`] instead.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::admission::Admission;
use super::builder::QueueBuilder;
use super::enforcer::check_wait;
use super::stats::{Gauges, QueueStats};
use super::supervisor::ExecutionSupervisor;
use super::waiting::{WaitingEntry, WaitingStore};
use crate::config::QueueConfig;
use crate::sinks::Sinks;
use crate::tasks::{Execute, TaskResult};

/// Messages processed by the dispatcher.
pub(crate) enum Command<X: Execute> {
    /// New submission, stamped when `add` was called.
    Add {
        task: X::Task,
        enqueued_at: Instant,
    },
    /// One admitted task reached its single outcome.
    Settled { seq: u64, outcome: TaskResult<X> },
}

/// Handle to a bounded-concurrency task queue.
///
/// Cloning is cheap; every clone feeds the same dispatcher.
///
/// Must be created inside a Tokio runtime (the dispatcher is spawned on construction).
///
/// Do not move a clone into a sink: use [`Queue::downgrade`] there.
pub struct Queue<X: Execute> {
    tx: mpsc::UnboundedSender<Command<X>>,
    gauges: Arc<Gauges>,
    config: Arc<QueueConfig>,
    _alive: Arc<HandleGuard>,
}

/// Cancels its token when the last handle is dropped.
struct HandleGuard {
    closed: CancellationToken,
}

impl Drop for HandleGuard {
    fn drop(&mut self) {
        self.closed.cancel();
    }
}

impl<X: Execute> Queue<X> {
    /// Creates a queue and spawns its dispatcher.
    pub fn new(config: QueueConfig, executor: Arc<X>, sinks: Sinks<X>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let gauges = Arc::new(Gauges::new(config.concurrency_limit()));
        let closed = CancellationToken::new();

        let dispatcher = Dispatcher {
            admission: Admission::new(config.concurrency_limit()),
            waiting: WaitingStore::new(),
            supervisor: ExecutionSupervisor::new(executor, config.execution_limit(), tx.clone()),
            wait_limit: config.wait_limit(),
            sinks,
            gauges: Arc::clone(&gauges),
            next_seq: 0,
        };
        tokio::spawn(dispatcher.run(rx, closed.clone()));

        Self {
            tx,
            gauges,
            config: Arc::new(config),
            _alive: Arc::new(HandleGuard { closed }),
        }
    }

    /// Starts building a queue around `executor`.
    pub fn builder(executor: Arc<X>) -> QueueBuilder<X> {
        QueueBuilder::new(executor)
    }

    /// Submits a task.
    ///
    /// Never blocks and never fails: the task is started if a slot is free,
    /// otherwise it waits in FIFO order. Its outcome is delivered to the sinks.
    pub fn add(&self, task: X::Task) {
        let cmd = Command::Add {
            task,
            enqueued_at: Instant::now(),
        };
        if self.tx.send(cmd).is_err() {
            // Only reachable if the dispatcher task panicked or the runtime shut down.
            warn!("queue dispatcher is gone; task dropped");
        }
    }

    /// Returns a snapshot of the queue counters.
    pub fn stats(&self) -> QueueStats {
        self.gauges.snapshot()
    }

    /// Returns the configuration the queue was built with.
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Creates a [`WeakQueue`] that does not keep the dispatcher alive.
    pub fn downgrade(&self) -> WeakQueue<X> {
        WeakQueue {
            tx: self.tx.downgrade(),
            gauges: Arc::clone(&self.gauges),
            config: Arc::clone(&self.config),
            alive: Arc::downgrade(&self._alive),
        }
    }
}

impl<X: Execute> Clone for Queue<X> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            gauges: Arc::clone(&self.gauges),
            config: Arc::clone(&self.config),
            _alive: Arc::clone(&self._alive),
        }
    }
}

/// Non-owning handle to a [`Queue`], safe to capture in sinks.
///
/// Upgrades only while at least one strong [`Queue`] handle exists.
pub struct WeakQueue<X: Execute> {
    tx: mpsc::WeakUnboundedSender<Command<X>>,
    gauges: Arc<Gauges>,
    config: Arc<QueueConfig>,
    alive: Weak<HandleGuard>,
}

impl<X: Execute> WeakQueue<X> {
    /// Returns a strong handle, or `None` once every [`Queue`] was dropped.
    pub fn upgrade(&self) -> Option<Queue<X>> {
        // The guard decides liveness; the dispatcher holds its own sender.
        let alive = self.alive.upgrade()?;
        let tx = self.tx.upgrade()?;
        Some(Queue {
            tx,
            gauges: Arc::clone(&self.gauges),
            config: Arc::clone(&self.config),
            _alive: alive,
        })
    }
}

impl<X: Execute> Clone for WeakQueue<X> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            gauges: Arc::clone(&self.gauges),
            config: Arc::clone(&self.config),
            alive: Weak::clone(&self.alive),
        }
    }
}

/// Sole owner of the queue state.
struct Dispatcher<X: Execute> {
    admission: Admission,
    waiting: WaitingStore<X::Task>,
    supervisor: ExecutionSupervisor<X>,
    wait_limit: Option<Duration>,
    sinks: Sinks<X>,
    gauges: Arc<Gauges>,
    next_seq: u64,
}

impl<X: Execute> Dispatcher<X> {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command<X>>, closed: CancellationToken) {
        loop {
            tokio::select! {
                biased;

                Some(cmd) = rx.recv() => match cmd {
                    Command::Add { task, enqueued_at } => self.on_add(task, enqueued_at),
                    Command::Settled { seq, outcome } => self.on_settled(seq, outcome),
                },
                _ = closed.cancelled(), if self.is_idle() => break,
                else => break,
            }
        }
        debug!("queue dispatcher stopped");
    }

    fn on_add(&mut self, task: X::Task, enqueued_at: Instant) {
        self.next_seq += 1;
        let seq = self.next_seq;

        if self.admission.try_acquire() {
            self.start(seq, task);
        } else {
            self.waiting.push(WaitingEntry {
                seq,
                task,
                enqueued_at,
            });
            trace!(seq, waiting = self.waiting.len(), "task enqueued");
        }
        self.sync_gauges();
    }

    fn on_settled(&mut self, seq: u64, outcome: TaskResult<X>) {
        self.admission.release();
        trace!(seq, ok = outcome.is_ok(), "task settled");
        self.complete(&outcome);

        self.advance();
        self.sync_gauges();

        if self.admission.in_flight() == 0 {
            debug!("queue drained");
            self.sinks.drain();
        }
    }

    /// Fills freed slots from the head of the waiting store.
    ///
    /// Stale entries are failed in FIFO order until one is admitted or the
    /// store runs empty.
    fn advance(&mut self) {
        while self.admission.has_free_slot() {
            let Some(entry) = self.waiting.pop() else {
                break;
            };
            let seq = entry.seq;
            match check_wait(entry, self.wait_limit, Instant::now()) {
                Ok(entry) => {
                    let admitted = self.admission.try_acquire();
                    debug_assert!(admitted, "free slot vanished during advance");
                    self.start(entry.seq, entry.task);
                }
                Err(err) => {
                    warn!(seq, error = %err, "task expired while waiting");
                    self.complete(&Err(err));
                }
            }
        }
    }

    fn start(&mut self, seq: u64, task: X::Task) {
        trace!(seq, in_flight = self.admission.in_flight(), "task admitted");
        self.supervisor.supervise(seq, task);
    }

    fn complete(&self, outcome: &TaskResult<X>) {
        self.gauges.record_completed();
        self.sinks.report(outcome);
    }

    fn sync_gauges(&self) {
        self.gauges
            .store(self.admission.in_flight(), self.waiting.len());
    }

    fn is_idle(&self) -> bool {
        self.admission.in_flight() == 0 && self.waiting.is_empty()
    }
}
