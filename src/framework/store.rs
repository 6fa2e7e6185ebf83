//! # Completion Store
//!
//! Finished orders waiting at the pass for their waiter. Orders are keyed by
//! [`OrderId`] in a sharded concurrent map, so chefs publishing and waiters
//! collecting never need an outside lock, and waiters racing on different
//! orders do not contend.

use crate::model::{Order, OrderId, OrderSummary};
use dashmap::DashMap;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct CompletionStore {
    ready: DashMap<OrderId, Order>,
}

impl CompletionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a finished order on the pass.
    pub fn publish(&self, order: Order) {
        let id = order.id();
        if let Some(previous) = self.ready.insert(id, order) {
            warn!(order_id = %id, dish = previous.dish(), "Order published twice, replacing earlier copy");
        }
        debug!(order_id = %id, ready = self.ready.len(), "Published");
    }

    /// Takes the order with `id` off the pass if it is there.
    ///
    /// Exactly one caller can ever get `Some` for a given published order.
    pub fn try_remove(&self, id: OrderId) -> Option<Order> {
        self.ready.remove(&id).map(|(_, order)| order)
    }

    /// Clears the pass, returning how many orders nobody came back for.
    pub fn drain(&self) -> usize {
        let mut unclaimed = 0;
        self.ready.retain(|id, order| {
            warn!(order_id = %id, dish = order.dish(), waiter = order.waiter(), "Ready order never collected");
            unclaimed += 1;
            false
        });
        unclaimed
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.ready.contains_key(&id)
    }

    /// Lazily walks the orders currently on the pass.
    ///
    /// For reporting only: concurrent publishes and removals may or may not be
    /// reflected.
    pub fn snapshot(&self) -> impl Iterator<Item = OrderSummary> + '_ {
        self.ready.iter().map(|entry| entry.value().summary())
    }

    /// Advisory count of ready orders.
    pub fn len(&self) -> usize {
        self.ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }
}
