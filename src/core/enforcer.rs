//! # Wait-timeout enforcement.
//!
//! Decides, at the moment a slot frees, whether the entry at the head of the
//! waiting store may still run. The check is lazy: nothing times out while it
//! sits in the store, only when it is dequeued.

use std::time::Duration;

use tokio::time::Instant;

use super::waiting::WaitingEntry;
use crate::error::QueueError;

/// Admits a dequeued entry or turns it into a [`QueueError::WaitTimeout`].
///
/// - `limit = None` → always admitted
/// - `now - enqueued_at <= limit` → admitted
/// - otherwise → failed; the caller must not execute the task
pub(crate) fn check_wait<T, E>(
    entry: WaitingEntry<T>,
    limit: Option<Duration>,
    now: Instant,
) -> Result<WaitingEntry<T>, QueueError<T, E>> {
    let Some(limit) = limit else {
        return Ok(entry);
    };
    let waited = now.saturating_duration_since(entry.enqueued_at);
    if waited > limit {
        Err(QueueError::WaitTimeout {
            task: entry.task,
            waited,
            limit,
        })
    } else {
        Ok(entry)
    }
}
