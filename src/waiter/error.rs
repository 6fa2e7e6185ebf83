//! Error types for the waiter loop.

use crate::framework::QueueError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WaiterError {
    /// The restaurant is closing; the current order was given up.
    #[error("Waiter stopped before the order was served")]
    Cancelled,

    /// There is nothing on the menu to order.
    #[error("The menu is empty")]
    EmptyMenu,
}

impl From<QueueError> for WaiterError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Cancelled => Self::Cancelled,
        }
    }
}
