//! # Example: queue
//!
//! Ten tasks with growing durations pushed through a queue of three slots.
//!
//! Demonstrates how to:
//! - Define the execution operation with [`ExecuteFn`].
//! - Bound waiting time (5s) and execution time (10s).
//! - Observe outcomes through [`Sinks::logging`] and `tracing-subscriber`.
//!
//! ## Flow
//! ```text
//! Task0..Task2 ──► admitted immediately
//! Task3..Task9 ──► waiting store (FIFO)
//!     └─► on each completion the head is checked:
//!           waited > 5s ──► wait_timeout (never executed)
//!           otherwise   ──► executed (timeout after 10s)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example queue --features logging
//! ```

use std::time::Duration;

use slotqueue::{ExecuteFn, Queue, QueueConfig, Sinks};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct Job {
    name: String,
    interval: Duration,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // 1. Limits: three slots, 5s waiting, 10s execution
    let cfg = QueueConfig::default()
        .with_concurrency(3)
        .with_wait(Duration::from_secs(5))
        .with_timeout(Duration::from_secs(10));

    // 2. Execution operation: sleep for the job's interval, hand the job back
    let exec = ExecuteFn::arc(|job: Job| async move {
        tokio::time::sleep(job.interval).await;
        Ok::<_, std::io::Error>(job)
    });

    // 3. Log every outcome, and signal when the queue goes idle
    let (drained_tx, mut drained) = mpsc::unbounded_channel();
    let queue = Queue::builder(exec)
        .config(cfg)
        .sinks(Sinks::logging())
        .on_drain(move || {
            info!("queue drain");
            let _ = drained_tx.send(());
        })
        .build();

    // 4. Submit
    for i in 0..10u64 {
        let job = Job {
            name: format!("Task{i}"),
            interval: Duration::from_millis(i * 1000),
        };
        info!(task = %job.name, interval = ?job.interval, "add");
        queue.add(job);
    }

    // 5. Wait until everything settled
    drained.recv().await;
    info!(stats = ?queue.stats(), "done");
    Ok(())
}
