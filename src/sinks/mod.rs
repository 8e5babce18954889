//! # Notification sinks for task outcomes.
//!
//! [`Sinks`] holds the typed handlers a queue calls for every outcome:
//! success, failure, done, and drain (queue became idle).
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use slotqueue::{Execute, Sinks};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Execute for Echo {
//!     type Task = u64;
//!     type Output = u64;
//!     type Error = std::io::Error;
//!
//!     async fn execute(&self, n: u64) -> Result<u64, std::io::Error> {
//!         Ok(n)
//!     }
//! }
//!
//! let sinks = Sinks::<Echo>::new()
//!     .with_success(|n: &u64| println!("finished {n}"))
//!     .with_failure(|err| println!("{} failed: {err}", err.task()))
//!     .with_drain(|| println!("idle"));
//! # let _ = sinks;
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;

pub use set::Sinks;
