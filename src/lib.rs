#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Restaurant Pipeline
//!
//! > **A bounded producer/consumer pipeline, dressed up as a restaurant.**
//!
//! Waiters take orders from guests and push them into a fixed-capacity queue.
//! A dispatcher feeds them to a crew of chefs, who cook each order for a
//! menu-defined time and put it on the pass. Every waiter collects its own
//! orders there.
//!
//! ```text
//! Waiter ─┐                                         ┌─ Chef ─┐
//! Waiter ─┼─▶ BoundedWorkQueue ─▶ Dispatcher ─▶ Pool ┼─ Chef ─┼─▶ CompletionStore ─▶ Waiter
//! Waiter ─┘        (backpressure)                    └─ Chef ─┘        (pickup by id)
//! ```
//!
//! ## Architecture Notes
//!
//! ### 1. One owner per order
//! An [`Order`](model::Order) is moved, never shared: from the waiter into the
//! queue, from the queue to the dispatcher, into exactly one chef's task, onto
//! the pass and finally back to its waiter. Only one task can ever change it.
//!
//! ### 2. Backpressure instead of buffering
//! The queue is bounded. When the kitchen falls behind, waiters wait at the
//! queue; nothing is dropped while the restaurant is open.
//!
//! ### 3. Cooperative shutdown
//! Every wait in the pipeline races a
//! [`CancellationToken`](tokio_util::sync::CancellationToken). Stopping closes
//! the front of house first, gives the chefs a grace period, then cancels them.
//! See [`Restaurant::stop`](lifecycle::Restaurant::stop).
//!
//! ### 4. Observability
//! `tracing` everywhere, with structured fields (`order_id`, `chef`, `waiter`,
//! `queue_depth`). See [`lifecycle::tracing`].
//!
//! ## Module Tour
//!
//! - [`model`]: orders, their state machine, and the menu
//! - [`framework`]: queue, completion store and worker pool, independent of restaurants
//! - [`kitchen`]: the dispatcher loop and the menu-driven cook function
//! - [`waiter`]: the order-taking loop
//! - [`lifecycle`]: configuration, the [`Restaurant`](lifecycle::Restaurant) supervisor, tracing setup
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod framework;
pub mod kitchen;
pub mod lifecycle;
pub mod model;
pub mod waiter;
