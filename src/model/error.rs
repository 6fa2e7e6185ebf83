//! Error types for the order model and the menu.

use crate::model::{OrderId, OrderStatus};
use thiserror::Error;

/// Errors raised by illegal order state changes.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The order is not in the state the transition starts from.
    #[error("Order {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },
}

/// Validation failures when mutating the menu.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuError {
    /// The dish label is empty or only whitespace.
    #[error("Dish name must not be empty")]
    EmptyLabel,

    /// The cooking time is zero or negative.
    #[error("Cooking time must be positive, got {0} ms")]
    NonPositiveCookTime(i64),
}
