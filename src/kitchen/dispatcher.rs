//! # Kitchen Dispatcher
//!
//! The single control loop between the order queue and the chefs.
//!
//! ```text
//! Stopped ──run()──▶ Running ──cancel──▶ Stopping ──loop exit──▶ Stopped
//! ```
//!
//! Each iteration waits at most `poll_timeout` for an order, hands it to the
//! [`WorkerPool`], then idles briefly. The cancellation token is raced at both
//! waits, so the loop notices shutdown within roughly one `poll_timeout`.

use crate::framework::{BoundedWorkQueue, Recipe, WorkerPool};
use crate::model::Order;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(100);
pub const DEFAULT_IDLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatcherState {
    Stopped,
    Running,
    Stopping,
}

/// Shared, lock-free view of a dispatcher's [`DispatcherState`].
#[derive(Debug, Default)]
pub struct DispatcherStateCell(AtomicU8);

impl DispatcherStateCell {
    pub fn get(&self) -> DispatcherState {
        match self.0.load(Ordering::SeqCst) {
            1 => DispatcherState::Running,
            2 => DispatcherState::Stopping,
            _ => DispatcherState::Stopped,
        }
    }

    pub fn set(&self, state: DispatcherState) {
        let raw = match state {
            DispatcherState::Stopped => 0,
            DispatcherState::Running => 1,
            DispatcherState::Stopping => 2,
        };
        self.0.store(raw, Ordering::SeqCst);
    }
}

pub struct Dispatcher {
    queue: Arc<BoundedWorkQueue>,
    pool: Arc<WorkerPool>,
    recipe: Arc<dyn Recipe>,
    submitted: Arc<AtomicU64>,
    state: Arc<DispatcherStateCell>,
    poll_timeout: Duration,
    idle: Duration,
}

impl Dispatcher {
    pub fn new(queue: Arc<BoundedWorkQueue>, pool: Arc<WorkerPool>, recipe: Arc<dyn Recipe>) -> Self {
        Self {
            queue,
            pool,
            recipe,
            submitted: Arc::new(AtomicU64::new(0)),
            state: Arc::new(DispatcherStateCell::default()),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            idle: DEFAULT_IDLE,
        }
    }

    /// Overrides the queue wait and the pause between iterations.
    pub fn with_timing(mut self, poll_timeout: Duration, idle: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self.idle = idle;
        self
    }

    /// Counts submissions into `counter` instead of a private one.
    pub fn with_counter(mut self, counter: Arc<AtomicU64>) -> Self {
        self.submitted = counter;
        self
    }

    /// Publishes state changes into `state` instead of a private cell.
    pub fn with_state(mut self, state: Arc<DispatcherStateCell>) -> Self {
        self.state = state;
        self
    }

    pub fn submitted(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.submitted)
    }

    pub fn state(&self) -> Arc<DispatcherStateCell> {
        Arc::clone(&self.state)
    }

    /// Runs the dispatch loop until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        self.state.set(DispatcherState::Running);
        info!(
            poll_ms = self.poll_timeout.as_millis() as u64,
            chefs = self.pool.size(),
            "Dispatcher started"
        );

        loop {
            let popped = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                popped = self.queue.pop_timeout(self.poll_timeout) => popped,
            };
            if let Some(order) = popped {
                self.dispatch(order);
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.idle) => {}
            }
        }

        self.state.set(DispatcherState::Stopping);
        info!(
            submitted = self.submitted.load(Ordering::SeqCst),
            queue_depth = self.queue.len(),
            "Dispatcher stopping"
        );
        self.state.set(DispatcherState::Stopped);
    }

    fn dispatch(&self, order: Order) {
        let order_id = order.id();
        debug!(%order_id, dish = order.dish(), waiter = order.waiter(), "Dispatching");

        match self.pool.submit(order, Arc::clone(&self.recipe)) {
            Ok(()) => {
                let submitted = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
                info!(%order_id, queue_depth = self.queue.len(), submitted, "Order sent to kitchen");
            }
            Err(e) => warn!(%order_id, error = %e, "Order lost, kitchen is closed"),
        }
    }
}
