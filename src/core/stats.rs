//! # Read-only queue gauges.
//!
//! The dispatcher owns the queue state; after every step it mirrors the
//! counters into [`Gauges`] so that handles can read a [`QueueStats`] snapshot
//! without a round-trip. Readings are eventually consistent.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Point-in-time view of a queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Tasks currently executing (never above `concurrency`).
    pub in_flight: usize,
    /// Tasks parked in the waiting store.
    pub waiting: usize,
    /// Tasks that reached a terminal outcome (success or any failure).
    pub completed: u64,
    /// Configured number of slots.
    pub concurrency: usize,
}

/// Atomics written by the dispatcher, read by handles.
#[derive(Debug)]
pub(crate) struct Gauges {
    in_flight: AtomicUsize,
    waiting: AtomicUsize,
    completed: AtomicU64,
    concurrency: usize,
}

impl Gauges {
    pub fn new(concurrency: usize) -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            waiting: AtomicUsize::new(0),
            completed: AtomicU64::new(0),
            concurrency,
        }
    }

    pub fn store(&self, in_flight: usize, waiting: usize) {
        self.in_flight.store(in_flight, Ordering::Release);
        self.waiting.store(waiting, Ordering::Release);
    }

    pub fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::AcqRel);
    }

    pub fn snapshot(&self) -> QueueStats {
        QueueStats {
            in_flight: self.in_flight.load(Ordering::Acquire),
            waiting: self.waiting.load(Ordering::Acquire),
            completed: self.completed.load(Ordering::Acquire),
            concurrency: self.concurrency,
        }
    }
}
