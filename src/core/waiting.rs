//! # Waiting store.
//!
//! FIFO of tasks that could not be admitted because every slot was busy.
//! Entries are appended at the tail and dispatched from the head.

use std::collections::VecDeque;

use tokio::time::Instant;

/// A task parked until a slot frees.
#[derive(Debug)]
pub(crate) struct WaitingEntry<T> {
    /// Dispatcher-assigned sequence number (for logs).
    pub seq: u64,
    /// The submitted task.
    pub task: T,
    /// When [`Queue::add`](crate::Queue::add) was called for it.
    pub enqueued_at: Instant,
}

/// Ordered collection of [`WaitingEntry`].
#[derive(Debug)]
pub(crate) struct WaitingStore<T> {
    entries: VecDeque<WaitingEntry<T>>,
}

impl<T> WaitingStore<T> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Appends an entry at the tail.
    pub fn push(&mut self, entry: WaitingEntry<T>) {
        self.entries.push_back(entry);
    }

    /// Removes the oldest entry.
    pub fn pop(&mut self) -> Option<WaitingEntry<T>> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
