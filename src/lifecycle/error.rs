//! Error types for restaurant configuration.

use thiserror::Error;

/// Reasons a [`KitchenConfig`](crate::lifecycle::KitchenConfig) is rejected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// The order queue must hold at least one order.
    #[error("Queue capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("At least one chef is required")]
    NoChefs,

    #[error("At least one waiter is required")]
    NoWaiters,

    #[error("At least one customer name is required")]
    NoCustomers,

    /// A delay range has `min > max`.
    #[error("Invalid delay range for {0}: min exceeds max")]
    InvalidRange(&'static str),
}
