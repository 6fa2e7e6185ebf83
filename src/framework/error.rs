//! # Framework Errors
//!
//! Errors raised by the kitchen plumbing. Both are about shutdown: nothing in
//! the queue or the pool fails while the restaurant is running normally.

use crate::model::OrderId;

/// Errors from [`BoundedWorkQueue`](crate::framework::BoundedWorkQueue).
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum QueueError {
    /// Shutdown was requested while the producer was waiting for space.
    /// The order was not enqueued.
    #[error("Queue push cancelled by shutdown")]
    Cancelled,
}

/// Errors from [`WorkerPool`](crate::framework::WorkerPool).
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum PoolError {
    /// The pool no longer accepts work. The order was dropped.
    #[error("Worker pool is shut down, order {0} rejected")]
    ShutDown(OrderId),
}
