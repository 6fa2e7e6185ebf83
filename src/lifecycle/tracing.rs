//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global `tracing` subscriber for the restaurant.
//!
//! ## Configuration
//!
//! Log lines use the compact format without the crate/module prefix
//! (`with_target(false)`). Every event carries structured fields instead, so
//! a line can be filtered by order, chef or waiter.
//!
//! ```bash
//! # Lifecycle events and every order as it moves through the kitchen
//! RUST_LOG=info cargo run
//!
//! # Per-poll detail: dispatching, waiting for pickup, publishing
//! RUST_LOG=debug cargo run
//!
//! # Only the kitchen plumbing
//! RUST_LOG=restaurant_pipeline::framework=debug cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Lifecycle**: restaurant opened/closing, dispatcher and waiters started and finished
//! - **Orders**: placed, sent to kitchen, cooking, ready, served (`order_id`, `dish`, `chef`, `waiter`)
//! - **Backpressure**: `queue_depth` on every hand-off
//! - **Losses**: abandoned, discarded and drained orders at `warn`
//!
//! With `RUST_LOG=info` a single order looks like:
//!
//! ```text
//! INFO waiter: Order placed order_id=#7 waiter="Waiter Igor" customer="Olga" dish="Burger"
//! INFO Order sent to kitchen order_id=#7 queue_depth=0 submitted=7
//! INFO Started cooking chef="Cook Elena" order_id=#7 dish="Burger"
//! INFO Finished cooking chef="Cook Elena" order_id=#7 dish="Burger" cook_ms=2731
//! INFO waiter: Order served order_id=#7 waiter="Waiter Igor" customer="Olga" dish="Burger" cooking_ms=2731 total_ms=3102 served=2
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // structured fields identify the component
        .compact()
        .init();
}
