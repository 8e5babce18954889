//! # Function-backed executor (`ExecuteFn`)
//!
//! [`ExecuteFn`] wraps a closure `F: Fn(T) -> Fut`, producing a fresh future per
//! task. The closure must be `Fn` (not `FnMut`): several tasks run through it at
//! the same time. If shared state is needed, capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use slotqueue::ExecuteFn;
//!
//! let double = ExecuteFn::arc(|n: u64| async move { Ok::<_, std::io::Error>(n * 2) });
//! # let _ = double;
//! ```

use std::fmt::Debug;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::tasks::execute::Execute;

/// Closure-backed [`Execute`] implementation.
pub struct ExecuteFn<F, T> {
    f: F,
    _task: PhantomData<fn(T)>,
}

impl<F, T> ExecuteFn<F, T> {
    /// Creates a new function-backed executor.
    ///
    /// Prefer [`ExecuteFn::arc`] when you immediately pass it to a queue.
    pub fn new<Fut>(f: F) -> Self
    where
        F: Fn(T) -> Fut,
    {
        Self {
            f,
            _task: PhantomData,
        }
    }

    /// Creates the executor and returns it as a shared handle.
    pub fn arc<Fut>(f: F) -> Arc<Self>
    where
        F: Fn(T) -> Fut,
    {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut, T, O, E> Execute for ExecuteFn<F, T>
where
    F: Fn(T) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<O, E>> + Send + 'static,
    T: Clone + Debug + Send + 'static,
    O: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    type Task = T;
    type Output = O;
    type Error = E;

    async fn execute(&self, task: T) -> Result<O, E> {
        (self.f)(task).await
    }
}
