//! # Execution operation abstractions.
//!
//! - [`Execute`] - trait for the async operation run for every admitted task
//! - [`ExecuteFn`] - closure-backed implementation

mod execute;
mod execute_fn;

pub use execute::Execute;
pub use execute_fn::ExecuteFn;

/// Outcome of one task as seen by the sinks.
pub type TaskResult<X> = Result<<X as Execute>::Output, ErrorOf<X>>;

/// [`QueueError`](crate::QueueError) specialized for an executor.
pub type ErrorOf<X> = crate::error::QueueError<<X as Execute>::Task, <X as Execute>::Error>;
