//! # Waiters
//!
//! A waiter is the producer side of the pipeline. Each one runs its own loop:
//!
//! ```text
//! Idle ──take order──▶ OrderPlaced ──queue accepts──▶ AwaitingCompletion ──pickup──▶ Served ──▶ Idle
//! ```
//!
//! - **Idle**: spends a random "taking the order" interval with a random guest,
//!   picks a random dish from the [`Menu`].
//! - **OrderPlaced**: pushes the order into the [`BoundedWorkQueue`], waiting
//!   there while the kitchen is backed up.
//! - **AwaitingCompletion**: checks the [`CompletionStore`] for its own order
//!   every `pickup_poll` until it can take it.
//! - **Served**: counts the order, then rests before the next one.
//!
//! Every wait races the run's cancellation token, so a stopping restaurant never
//! waits on a waiter for longer than one suspension point.

pub mod error;

pub use error::*;

use crate::framework::{BoundedWorkQueue, CompletionStore};
use crate::lifecycle::DelayRange;
use crate::model::{Menu, Order, OrderId};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaiterState {
    Idle,
    OrderPlaced,
    AwaitingCompletion,
    Served,
}

impl WaiterState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::OrderPlaced,
            2 => Self::AwaitingCompletion,
            3 => Self::Served,
            _ => Self::Idle,
        }
    }

    fn as_raw(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::OrderPlaced => 1,
            Self::AwaitingCompletion => 2,
            Self::Served => 3,
        }
    }
}

/// Live counters of one waiter, readable while the loop runs.
#[derive(Debug)]
pub struct WaiterStats {
    name: String,
    served: AtomicU64,
    state: AtomicU8,
}

/// Point-in-time copy of [`WaiterStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaiterReport {
    pub name: String,
    pub served: u64,
    pub state: WaiterState,
}

impl WaiterStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            served: AtomicU64::new(0),
            state: AtomicU8::new(WaiterState::Idle.as_raw()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn served(&self) -> u64 {
        self.served.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> WaiterState {
        WaiterState::from_raw(self.state.load(Ordering::SeqCst))
    }

    pub fn report(&self) -> WaiterReport {
        WaiterReport {
            name: self.name.clone(),
            served: self.served(),
            state: self.state(),
        }
    }

    fn set_state(&self, state: WaiterState) {
        self.state.store(state.as_raw(), Ordering::SeqCst);
    }

    fn record_served(&self) -> u64 {
        self.served.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Delays that pace a waiter's loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaiterTiming {
    pub order_taking: DelayRange,
    pub between_orders: DelayRange,
    pub pickup_poll: Duration,
}

impl Default for WaiterTiming {
    fn default() -> Self {
        Self {
            order_taking: DelayRange::from_millis(300, 800),
            between_orders: DelayRange::from_millis(500, 1500),
            pickup_poll: Duration::from_millis(200),
        }
    }
}

pub struct Waiter {
    stats: Arc<WaiterStats>,
    queue: Arc<BoundedWorkQueue>,
    store: Arc<CompletionStore>,
    menu: Arc<Menu>,
    customers: Vec<String>,
    timing: WaiterTiming,
}

impl Waiter {
    pub fn new(
        name: impl Into<String>,
        queue: Arc<BoundedWorkQueue>,
        store: Arc<CompletionStore>,
        menu: Arc<Menu>,
        customers: Vec<String>,
        timing: WaiterTiming,
    ) -> Self {
        Self {
            stats: Arc::new(WaiterStats::new(name)),
            queue,
            store,
            menu,
            customers,
            timing,
        }
    }

    pub fn name(&self) -> &str {
        self.stats.name()
    }

    /// Handle to this waiter's counters that outlives the loop.
    pub fn stats(&self) -> Arc<WaiterStats> {
        Arc::clone(&self.stats)
    }

    /// Writes up a new order for `customer`.
    pub fn place_order(&self, customer: &str, dish: &str) -> Order {
        let order = Order::new(customer, dish, self.name());
        self.stats.set_state(WaiterState::OrderPlaced);
        info!(order_id = %order.id(), waiter = self.name(), customer, dish, "Order placed");
        order
    }

    /// Places one order, hands it to the kitchen and waits until it is picked up.
    pub async fn serve(&self, customer: &str, dish: &str, cancel: &CancellationToken) -> Result<Order, WaiterError> {
        let order = self.place_order(customer, dish);
        let order_id = order.id();

        self.queue.push(order, cancel).await?;
        self.stats.set_state(WaiterState::AwaitingCompletion);
        debug!(%order_id, waiter = self.name(), queue_depth = self.queue.len(), "Waiting for kitchen");

        let order = self.await_pickup(order_id, cancel).await?;
        let served = self.stats.record_served();
        self.stats.set_state(WaiterState::Served);
        info!(
            %order_id,
            waiter = self.name(),
            customer = order.customer(),
            dish = order.dish(),
            cooking_ms = order.cooking_time().map(|t| t.as_millis() as u64),
            total_ms = order.total_time().map(|t| t.as_millis() as u64),
            served,
            "Order served"
        );
        Ok(order)
    }

    /// One full cycle with a random guest and a random dish.
    pub async fn serve_random(&self, cancel: &CancellationToken) -> Result<Order, WaiterError> {
        self.stats.set_state(WaiterState::Idle);
        pause(self.timing.order_taking.sample(), cancel).await?;

        let dish = self.menu.random_dish().ok_or(WaiterError::EmptyMenu)?;
        let customer = self.random_customer();
        self.serve(&customer, &dish, cancel).await
    }

    /// Polls the pass until order `id` can be taken.
    pub async fn await_pickup(&self, id: OrderId, cancel: &CancellationToken) -> Result<Order, WaiterError> {
        loop {
            if let Some(order) = self.store.try_remove(id) {
                return Ok(order);
            }
            pause(self.timing.pickup_poll, cancel).await?;
        }
    }

    /// Serves orders until `cancel` fires.
    #[instrument(name = "waiter", skip_all, fields(waiter = %self.name()))]
    pub async fn run(self, cancel: CancellationToken) {
        info!("Waiter started");
        loop {
            match self.serve_random(&cancel).await {
                Ok(_) => {}
                Err(WaiterError::Cancelled) => break,
                Err(WaiterError::EmptyMenu) => warn!("Menu is empty, nothing to order"),
            }
            if pause(self.timing.between_orders.sample(), &cancel).await.is_err() {
                break;
            }
        }
        self.stats.set_state(WaiterState::Idle);
        info!(served = self.stats.served(), "Waiter finished");
    }

    fn random_customer(&self) -> String {
        self.customers
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| "Guest".to_string())
    }
}

async fn pause(delay: Duration, cancel: &CancellationToken) -> Result<(), WaiterError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(WaiterError::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}
