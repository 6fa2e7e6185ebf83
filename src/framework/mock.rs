//! # Mock Recipes
//!
//! Utilities for testing the kitchen without the menu's multi-second cooking
//! times.
//!
//! - [`FixedRecipe`] cooks every order for the same short delay.
//! - [`RecordingRecipe`] does the same and additionally records what it saw, so
//!   tests can assert how the pool scheduled the work.
//!
//! # Example
//! ```ignore
//! let recipe = Arc::new(RecordingRecipe::new(Duration::from_millis(5)));
//! pool.submit(order, recipe.clone())?;
//! // ...
//! assert_eq!(recipe.overlaps(), 0);
//! ```

use crate::framework::Recipe;
use crate::model::{Order, OrderId, OrderStatus};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Cooks every order for `delay`, whatever the dish.
#[derive(Debug, Clone)]
pub struct FixedRecipe {
    delay: Duration,
}

impl FixedRecipe {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Recipe for FixedRecipe {
    async fn prepare(&self, _order: &Order) {
        tokio::time::sleep(self.delay).await;
    }
}

/// A [`FixedRecipe`] that keeps a log of every preparation.
///
/// - **overlaps**: times an order entered preparation while it was already
///   being prepared, or was handed over in a state other than `Cooking`.
///   Must stay zero.
/// - **peak_concurrency**: most preparations observed running at once.
#[derive(Debug, Default)]
pub struct RecordingRecipe {
    delay: Duration,
    in_progress: DashMap<OrderId, ()>,
    prepared_by_id: DashMap<OrderId, usize>,
    active: AtomicUsize,
    peak: AtomicUsize,
    started: AtomicUsize,
    prepared: AtomicUsize,
    overlaps: AtomicUsize,
}

impl RecordingRecipe {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Preparations that have begun (including ones later cancelled).
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Preparations that ran to completion.
    pub fn prepared(&self) -> usize {
        self.prepared.load(Ordering::SeqCst)
    }

    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn times_prepared(&self, id: OrderId) -> usize {
        self.prepared_by_id.get(&id).map(|count| *count).unwrap_or(0)
    }
}

#[async_trait]
impl Recipe for RecordingRecipe {
    async fn prepare(&self, order: &Order) {
        let id = order.id();
        self.started.fetch_add(1, Ordering::SeqCst);
        if order.status() != OrderStatus::Cooking || self.in_progress.insert(id, ()).is_some() {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(active, Ordering::SeqCst);

        let guard = ActiveGuard(self, id);
        tokio::time::sleep(self.delay).await;
        drop(guard);

        *self.prepared_by_id.entry(id).or_insert(0) += 1;
        self.prepared.fetch_add(1, Ordering::SeqCst);
    }
}

// Keeps the counters honest when the pool drops a preparation mid-sleep.
struct ActiveGuard<'a>(&'a RecordingRecipe, OrderId);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.in_progress.remove(&self.1);
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}
