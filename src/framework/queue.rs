//! # Bounded Work Queue
//!
//! The hand-off between waiters and the kitchen dispatcher. A fixed-capacity
//! FIFO built on a bounded Tokio MPSC channel:
//!
//! - **push** waits for a free slot (backpressure), racing the cancellation token.
//! - **pop_timeout** waits at most the given duration, so the single consumer can
//!   check for shutdown at bounded intervals.
//! - **len** and **waiting** are advisory only.
//!
//! A channel cannot be walked, so the queue keeps a side index of the orders
//! it holds for status reports.

use crate::framework::QueueError;
use crate::model::{Order, OrderId, OrderSummary};
use dashmap::DashMap;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Capacity of the kitchen queue in the baseline configuration.
pub const DEFAULT_QUEUE_CAPACITY: usize = 50;

pub struct BoundedWorkQueue {
    sender: mpsc::Sender<Order>,
    receiver: Mutex<mpsc::Receiver<Order>>,
    waiting: DashMap<OrderId, OrderSummary>,
}

impl BoundedWorkQueue {
    /// Creates an empty queue.
    ///
    /// # Panics
    /// Panics if `capacity` is zero. [`KitchenConfig::validate`](crate::lifecycle::KitchenConfig::validate)
    /// rejects that value before a queue is built from configuration.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            sender,
            receiver: Mutex::new(receiver),
            waiting: DashMap::new(),
        }
    }

    /// Appends `order` at the tail, waiting while the queue is full.
    ///
    /// Returns [`QueueError::Cancelled`] if `cancel` fires before a slot frees up;
    /// the order is dropped in that case.
    pub async fn push(&self, order: Order, cancel: &CancellationToken) -> Result<(), QueueError> {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(QueueError::Cancelled),
            permit = self.sender.reserve() => permit,
        };
        // The queue owns its receiver, so the channel cannot be closed here.
        let permit = permit.map_err(|_| QueueError::Cancelled)?;
        debug!(order_id = %order.id(), "Enqueued");
        self.waiting.insert(order.id(), order.summary());
        permit.send(order);
        Ok(())
    }

    /// Removes the head of the queue, waiting at most `wait` for one to arrive.
    pub async fn pop_timeout(&self, wait: Duration) -> Option<Order> {
        let order = tokio::time::timeout(wait, async {
            let mut receiver = self.receiver.lock().await;
            receiver.recv().await
        })
        .await
        .ok()
        .flatten()?;
        self.waiting.remove(&order.id());
        Some(order)
    }

    /// Removes everything currently queued and returns how many orders were dropped.
    pub async fn drain(&self) -> usize {
        let mut receiver = self.receiver.lock().await;
        let mut drained = 0;
        while let Ok(order) = receiver.try_recv() {
            self.waiting.remove(&order.id());
            warn!(order_id = %order.id(), dish = order.dish(), waiter = order.waiter(), "Queued order dropped");
            drained += 1;
        }
        drained
    }

    /// Orders currently queued, oldest first.
    pub fn waiting(&self) -> Vec<OrderSummary> {
        let mut waiting: Vec<OrderSummary> = self.waiting.iter().map(|entry| entry.value().clone()).collect();
        waiting.sort_by_key(|summary| summary.id);
        waiting
    }

    /// Number of queued orders. Advisory: may be stale by the time it is read.
    pub fn len(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

impl Default for BoundedWorkQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}
