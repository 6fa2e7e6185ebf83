//! Concurrency building blocks of the kitchen.
//!
//! These types know nothing about waiters or menus; they only move [`Order`](crate::model::Order)
//! values around safely.
//!
//! # Main Components
//!
//! - [`BoundedWorkQueue`] - Fixed-capacity FIFO with backpressure between waiters and the dispatcher
//! - [`CompletionStore`] - Concurrent pass where finished orders wait for pickup
//! - [`WorkerPool`] - Fixed crew of chefs cooking one order each, with graceful-then-forced shutdown
//! - [`Recipe`] - The cook function the pool runs for every order
//! - [`QueueError`], [`PoolError`] - Shutdown-related errors
//!
//! # Testing
//!
//! See [`mock`] for instrumented recipes.

pub mod error;
pub mod mock;
pub mod pool;
pub mod queue;
pub mod recipe;
pub mod store;

pub use error::*;
pub use pool::*;
pub use queue::*;
pub use recipe::*;
pub use store::*;
