//! # Execution operation abstraction.
//!
//! Defines the [`Execute`] trait: the caller-supplied async operation the queue
//! invokes for each admitted task. The queue treats it as opaque; it only awaits
//! the outcome and races it against the execution limit.

use std::fmt::Debug;

use async_trait::async_trait;

/// # Asynchronous operation run for every admitted task.
///
/// One executor instance is shared (`Arc<dyn ...>`) by all in-flight tasks, so
/// `execute` takes `&self` and may be called concurrently up to the queue's
/// concurrency limit.
///
/// - `Task` is the opaque payload submitted through [`Queue::add`](crate::Queue::add).
///   It is cloned so that timeout errors can carry it back to the caller.
/// - `Output` is the success value handed to the success sink.
/// - `Error` is kept verbatim in [`QueueError::Execution`](crate::QueueError::Execution).
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use slotqueue::Execute;
///
/// struct Resize;
///
/// #[async_trait]
/// impl Execute for Resize {
///     type Task = (u32, u32);
///     type Output = u32;
///     type Error = std::io::Error;
///
///     async fn execute(&self, (w, h): (u32, u32)) -> Result<u32, std::io::Error> {
///         Ok(w * h)
///     }
/// }
/// ```
#[async_trait]
pub trait Execute: Send + Sync + 'static {
    /// Payload submitted by the caller.
    type Task: Clone + Debug + Send + 'static;
    /// Value produced by a successful execution.
    type Output: Send + 'static;
    /// Error produced by a failed execution.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Executes one task.
    ///
    /// If the queue's execution limit fires first, the returned future keeps
    /// running to completion but its result is discarded.
    async fn execute(&self, task: Self::Task) -> Result<Self::Output, Self::Error>;
}
