//! # Slot accounting.
//!
//! [`Admission`] counts in-flight tasks against the fixed concurrency limit.
//!
//! ## Invariants
//! - `in_flight <= limit` at all times (`try_acquire` refuses otherwise).
//! - Every successful `try_acquire` is matched by exactly one `release`.

/// In-flight counter for a queue.
#[derive(Debug)]
pub(crate) struct Admission {
    in_flight: usize,
    limit: usize,
}

impl Admission {
    /// Creates a controller with `limit` slots (minimum 1).
    pub fn new(limit: usize) -> Self {
        Self {
            in_flight: 0,
            limit: limit.max(1),
        }
    }

    /// Reserves a slot if one is free.
    pub fn try_acquire(&mut self) -> bool {
        if self.has_free_slot() {
            self.in_flight += 1;
            true
        } else {
            false
        }
    }

    /// Returns a slot.
    pub fn release(&mut self) {
        debug_assert!(self.in_flight > 0, "slot released twice");
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    #[inline]
    pub fn has_free_slot(&self) -> bool {
        self.in_flight < self.limit
    }

    #[inline]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
