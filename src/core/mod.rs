//! Queue core: admission, dispatch and timeouts.
//!
//! The only public API from this module is [`Queue`] (with its [`QueueBuilder`]
//! and [`QueueStats`]).
//!
//! Internal modules:
//! - [`waiting`]: FIFO store of tasks waiting for a slot;
//! - [`admission`]: in-flight accounting against the concurrency limit;
//! - [`enforcer`]: wait-timeout check on dequeue;
//! - [`resolution`]: first-writer-wins result cell;
//! - [`supervisor`]: runs one task against the execution limit;
//! - [`queue`]: the handle and the dispatcher loop tying it all together.

mod admission;
mod builder;
mod enforcer;
mod queue;
mod resolution;
mod stats;
mod supervisor;
mod waiting;

#[cfg(test)]
mod tests;

pub use builder::QueueBuilder;
pub use queue::{Queue, WeakQueue};
pub use stats::QueueStats;
