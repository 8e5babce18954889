//! # slotqueue
//!
//! **Slotqueue** is a bounded-concurrency task queue for Tokio.
//!
//! Callers submit work items; the queue runs up to a fixed number of them at
//! once, holds the rest in FIFO order, and enforces two independent limits:
//! how long a task may **wait** for a slot, and how long an admitted task may
//! **run**. Every task ends in exactly one outcome, delivered to typed sinks.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     queue.add(task)    queue.add(task)    queue.add(task)
//!            │                  │                  │
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Dispatcher (single task, owns all state)                         │
//! │  - Admission     (in_flight vs concurrency)                       │
//! │  - WaitingStore  (FIFO of { task, enqueued_at })                  │
//! │  - Sinks         (success / failure / done / drain)               │
//! └──────┬──────────────────┬──────────────────┬──────────────────▲───┘
//!        ▼                  ▼                  ▼                  │
//!  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//!  │  Execution   │   │  Execution   │   │  Execution   │         │
//!  │  Supervisor  │   │  Supervisor  │   │  Supervisor  │         │
//!  │ exec ⟷ timer │   │ exec ⟷ timer │   │ exec ⟷ timer │         │
//!  └──────┬───────┘   └──────┬───────┘   └──────┬───────┘         │
//!         └──────────────────┴──────────────────┴─► Settled ──────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! add(task)
//!   ├─ free slot ──► in_flight += 1 ──► execute(task) racing timeout
//!   └─ no slot   ──► waiting.push_back(task, now)
//!
//! on settle (success | error | timeout | panic):
//!   ├─► in_flight -= 1
//!   ├─► on_success / on_failure, then on_done
//!   ├─► while slot free and waiting non-empty:
//!   │     ├─ waited > wait limit ──► on_failure(WaitTimeout), on_done, next
//!   │     └─ otherwise           ──► in_flight += 1, execute, stop
//!   └─► in_flight == 0 ──► on_drain
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                |
//! |-------------------|----------------------------------------------------------|-----------------------------------|
//! | **Queue**         | Admission, FIFO waiting, wait/execution limits.          | [`Queue`], [`WeakQueue`], [`QueueBuilder`] |
//! | **Execution**     | Caller-supplied async operation.                         | [`Execute`], [`ExecuteFn`]        |
//! | **Notifications** | Typed success/failure/done/drain handlers.               | [`Sinks`]                         |
//! | **Errors**        | Terminal outcome of a failed task.                       | [`QueueError`]                    |
//! | **Configuration** | Concurrency and time limits.                             | [`QueueConfig`]                   |
//! | **Introspection** | Read-only counters.                                      | [`QueueStats`]                    |
//!
//! ## Optional features
//! - `logging`: exposes `Sinks::logging()`, a sink preset reporting through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use slotqueue::{ExecuteFn, Queue};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let (drained_tx, mut drained) = tokio::sync::mpsc::unbounded_channel();
//!
//!     let exec = ExecuteFn::arc(|ms: u64| async move {
//!         tokio::time::sleep(Duration::from_millis(ms)).await;
//!         Ok::<_, std::io::Error>(ms)
//!     });
//!
//!     let queue = Queue::builder(exec)
//!         .concurrency(2)
//!         .wait(Duration::from_secs(1))
//!         .timeout(Duration::from_millis(50))
//!         .on_success(|ms: &u64| println!("slept {ms}ms"))
//!         .on_failure(|err| println!("task {:?} failed: {err}", err.task()))
//!         .on_drain(move || {
//!             let _ = drained_tx.send(());
//!         })
//!         .build();
//!
//!     for ms in [10, 20, 100, 30] {
//!         queue.add(ms);
//!     }
//!     drained.recv().await;
//! }
//! ```
mod config;
mod core;
mod error;
mod sinks;
mod tasks;

// ---- Public re-exports ----

pub use config::QueueConfig;
pub use crate::core::{Queue, QueueBuilder, QueueStats, WeakQueue};
pub use error::QueueError;
pub use sinks::Sinks;
pub use tasks::{ErrorOf, Execute, ExecuteFn, TaskResult};
