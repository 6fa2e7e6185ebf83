//! A single customer order moving through the pipeline.
//!
//! # Ownership
//! An `Order` is a value that is *moved* from stage to stage:
//! waiter → [`BoundedWorkQueue`](crate::framework::BoundedWorkQueue) → dispatcher →
//! exactly one chef → [`CompletionStore`](crate::framework::CompletionStore) → waiter.
//! It is intentionally not `Clone`, so only the current owner can mutate it.
//!
//! # Lifecycle
//! `Created → Cooking → Ready`. Transitions only move forward; see
//! [`Order::start_cooking`] and [`Order::finish_cooking`].

use crate::model::OrderError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

static NEXT_ORDER_ID: AtomicU64 = AtomicU64::new(1);

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl OrderId {
    /// Allocates the next process-wide identity. Identities are never reused.
    pub fn next() -> Self {
        Self(NEXT_ORDER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStatus {
    Created,
    Cooking,
    Ready,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderStatus::Created => "created",
            OrderStatus::Cooking => "cooking",
            OrderStatus::Ready => "ready",
        };
        f.write_str(label)
    }
}

#[derive(Debug)]
pub struct Order {
    id: OrderId,
    customer: String,
    dish: String,
    waiter: String,
    status: OrderStatus,
    created_at: Instant,
    cooking_started_at: Option<Instant>,
    ready_at: Option<Instant>,
}

impl Order {
    /// Creates a new Order instance.
    ///
    /// # Arguments
    /// * `customer` - Name of the guest who ordered
    /// * `dish` - Dish label as it appears on the menu
    /// * `waiter` - Name of the waiter who took the order and will pick it up
    ///
    /// The order gets a fresh [`OrderId`] and starts in [`OrderStatus::Created`].
    pub fn new(customer: impl Into<String>, dish: impl Into<String>, waiter: impl Into<String>) -> Self {
        Self {
            id: OrderId::next(),
            customer: customer.into(),
            dish: dish.into(),
            waiter: waiter.into(),
            status: OrderStatus::Created,
            created_at: Instant::now(),
            cooking_started_at: None,
            ready_at: None,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn dish(&self) -> &str {
        &self.dish
    }

    pub fn waiter(&self) -> &str {
        &self.waiter
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn cooking_started_at(&self) -> Option<Instant> {
        self.cooking_started_at
    }

    pub fn ready_at(&self) -> Option<Instant> {
        self.ready_at
    }

    /// `Created → Cooking`, stamping the start time.
    pub fn start_cooking(&mut self) -> Result<(), OrderError> {
        self.transition(OrderStatus::Created, OrderStatus::Cooking)?;
        self.cooking_started_at = Some(Instant::now());
        Ok(())
    }

    /// `Cooking → Ready`, stamping the end time.
    pub fn finish_cooking(&mut self) -> Result<(), OrderError> {
        self.transition(OrderStatus::Cooking, OrderStatus::Ready)?;
        self.ready_at = Some(Instant::now());
        Ok(())
    }

    fn transition(&mut self, expected: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        if self.status != expected {
            return Err(OrderError::InvalidTransition {
                id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Time spent in the kitchen. `None` until the order is ready.
    pub fn cooking_time(&self) -> Option<Duration> {
        match (self.status, self.cooking_started_at, self.ready_at) {
            (OrderStatus::Ready, Some(start), Some(end)) => Some(end.saturating_duration_since(start)),
            _ => None,
        }
    }

    /// Time from taking the order until it was ready. `None` until the order is ready.
    pub fn total_time(&self) -> Option<Duration> {
        match (self.status, self.ready_at) {
            (OrderStatus::Ready, Some(end)) => Some(end.saturating_duration_since(self.created_at)),
            _ => None,
        }
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            id: self.id,
            customer: self.customer.clone(),
            dish: self.dish.clone(),
            waiter: self.waiter.clone(),
            status: self.status,
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order {}: {} for {} (waiter: {}, status: {})",
            self.id, self.dish, self.customer, self.waiter, self.status
        )
    }
}

/// Read-only, serializable view of an [`Order`] used in status reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub customer: String,
    pub dish: String,
    pub waiter: String,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_monotonically() {
        let first = Order::new("Alice", "Burger", "Waiter Igor");
        let second = Order::new("Bob", "Burger", "Waiter Igor");
        assert!(second.id() > first.id());
    }

    #[test]
    fn lifecycle_moves_forward_with_ordered_timestamps() {
        let mut order = Order::new("Alice", "Burger", "Waiter Igor");
        assert_eq!(order.status(), OrderStatus::Created);
        assert!(order.cooking_time().is_none());
        assert!(order.total_time().is_none());

        order.start_cooking().unwrap();
        assert_eq!(order.status(), OrderStatus::Cooking);
        assert!(order.cooking_time().is_none());

        order.finish_cooking().unwrap();
        assert_eq!(order.status(), OrderStatus::Ready);

        let started = order.cooking_started_at().unwrap();
        let ready = order.ready_at().unwrap();
        assert!(order.created_at() <= started);
        assert!(started <= ready);
        assert!(order.total_time().unwrap() >= order.cooking_time().unwrap());
    }

    #[test]
    fn status_never_regresses() {
        let mut order = Order::new("Alice", "Burger", "Waiter Igor");

        let err = order.finish_cooking().unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidTransition {
                id: order.id(),
                from: OrderStatus::Created,
                to: OrderStatus::Ready,
            }
        );
        assert_eq!(order.status(), OrderStatus::Created);

        order.start_cooking().unwrap();
        assert!(order.start_cooking().is_err());
        order.finish_cooking().unwrap();
        assert!(order.start_cooking().is_err());
        assert!(order.finish_cooking().is_err());
        assert_eq!(order.status(), OrderStatus::Ready);
    }

    #[test]
    fn summary_mirrors_order() {
        let order = Order::new("Maria", "Lasagna", "Waiter Anna");
        let summary = order.summary();
        assert_eq!(summary.id, order.id());
        assert_eq!(summary.dish, "Lasagna");
        assert_eq!(summary.status, OrderStatus::Created);
        assert!(order.to_string().contains("Lasagna for Maria"));
    }
}
