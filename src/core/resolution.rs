//! # Single-resolution slot.
//!
//! [`Resolution`] is a "first writer wins" cell shared by the two contenders of
//! one execution: the operation itself and its timeout timer. The first call to
//! [`Resolution::settle`] delivers its value through a oneshot channel and
//! disarms the timer; every later call is a no-op and its value is dropped.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// First-writer-wins result cell.
pub(crate) struct Resolution<O> {
    settled: AtomicBool,
    sender: Mutex<Option<oneshot::Sender<O>>>,
    timer: CancellationToken,
}

impl<O> Resolution<O> {
    /// Creates the cell and the receiver that observes the winning value.
    pub fn new() -> (Self, oneshot::Receiver<O>) {
        let (tx, rx) = oneshot::channel();
        let cell = Self {
            settled: AtomicBool::new(false),
            sender: Mutex::new(Some(tx)),
            timer: CancellationToken::new(),
        };
        (cell, rx)
    }

    /// Offers a value. Returns `true` if this call won.
    pub fn settle(&self, value: O) -> bool {
        if self.settled.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.timer.cancel();

        let sender = match self.sender.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(tx) = sender {
            let _ = tx.send(value);
        }
        true
    }

    /// Token cancelled as soon as the cell is settled; timers select on it.
    pub fn timer_token(&self) -> CancellationToken {
        self.timer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_writer_wins() {
        let (cell, rx) = Resolution::new();
        assert!(cell.settle("timer"));
        assert!(!cell.settle("operation"));
        assert_eq!(rx.await.ok(), Some("timer"));
    }

    #[tokio::test]
    async fn test_settling_disarms_timer() {
        let (cell, _rx) = Resolution::new();
        let timer = cell.timer_token();
        assert!(!timer.is_cancelled());
        cell.settle(1u8);
        assert!(timer.is_cancelled());
    }
}
