//! # Worker Pool
//!
//! A fixed crew of chefs, each running in its own Tokio task and pulling jobs
//! from a shared, unbounded backlog. Submitting never blocks: when every chef is
//! busy the job simply waits in the backlog.
//!
//! ## Unit of work
//!
//! Each job is one order, handled end-to-end by exactly one chef:
//!
//! 1. `Created → Cooking`, start time recorded
//! 2. [`Recipe::prepare`] (the simulated cooking delay)
//! 3. `Cooking → Ready`, end time recorded
//! 4. published to the [`CompletionStore`]
//!
//! The order value is moved into the chef's task, so no other task can touch it
//! while it cooks.
//!
//! ## Shutdown
//!
//! [`WorkerPool::shutdown`] stops accepting jobs, lets the chefs work through
//! what they have for up to a grace period, then cancels them. A chef cancelled
//! mid-preparation drops the order without publishing it; jobs still in the
//! backlog are dropped too. Both are counted in the returned [`PoolShutdown`].

use crate::framework::{CompletionStore, PoolError, Recipe};
use crate::model::Order;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

struct Job {
    order: Order,
    recipe: Arc<dyn Recipe>,
}

type JobReceiver = Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<Job>>>;

/// Outcome of [`WorkerPool::shutdown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolShutdown {
    /// The grace period ran out and the remaining chefs were cancelled.
    pub forced: bool,
    /// Orders dropped mid-preparation.
    pub abandoned: usize,
    /// Orders dropped from the backlog before any chef picked them up.
    pub discarded: usize,
}

#[derive(Default)]
struct Counters {
    backlog: AtomicUsize,
    cooking: AtomicUsize,
    abandoned: AtomicUsize,
}

pub struct WorkerPool {
    sender: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    jobs: JobReceiver,
    workers: Mutex<Vec<JoinHandle<()>>>,
    counters: Arc<Counters>,
    cancel: CancellationToken,
    size: usize,
}

impl WorkerPool {
    /// Spawns one worker task per chef name.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(chefs: &[String], store: Arc<CompletionStore>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let jobs: JobReceiver = Arc::new(tokio::sync::Mutex::new(receiver));
        let counters = Arc::new(Counters::default());
        let cancel = CancellationToken::new();

        let workers = chefs
            .iter()
            .map(|chef| {
                tokio::spawn(run_worker(
                    chef.clone(),
                    Arc::clone(&jobs),
                    Arc::clone(&store),
                    Arc::clone(&counters),
                    cancel.clone(),
                ))
            })
            .collect();

        info!(chefs = chefs.len(), "Kitchen opened");
        Self {
            sender: Mutex::new(Some(sender)),
            jobs,
            workers: Mutex::new(workers),
            counters,
            cancel,
            size: chefs.len(),
        }
    }

    /// Hands `order` to the next free chef, queueing it in the backlog if all are busy.
    pub fn submit(&self, order: Order, recipe: Arc<dyn Recipe>) -> Result<(), PoolError> {
        let id = order.id();
        let guard = self.sender.lock();
        let Some(sender) = guard.as_ref() else {
            return Err(PoolError::ShutDown(id));
        };

        self.counters.backlog.fetch_add(1, Ordering::SeqCst);
        if sender.send(Job { order, recipe }).is_err() {
            self.counters.backlog.fetch_sub(1, Ordering::SeqCst);
            return Err(PoolError::ShutDown(id));
        }
        debug!(order_id = %id, backlog = self.backlog(), "Submitted to kitchen");
        Ok(())
    }

    /// Stops the pool, waiting up to `grace` for the chefs to finish on their own.
    ///
    /// Calling it again after the first shutdown returns immediately.
    pub async fn shutdown(&self, grace: Duration) -> PoolShutdown {
        drop(self.sender.lock().take());
        let mut pending = std::mem::take(&mut *self.workers.lock());

        info!(
            grace_ms = grace.as_millis() as u64,
            cooking = self.cooking(),
            backlog = self.backlog(),
            "Closing kitchen"
        );

        let finished = tokio::time::timeout(grace, async {
            while let Some(worker) = pending.last_mut() {
                if let Err(e) = worker.await {
                    error!("Chef task failed: {:?}", e);
                }
                pending.pop();
            }
        })
        .await
        .is_ok();

        if !finished {
            warn!(
                cooking = self.cooking(),
                backlog = self.backlog(),
                "Grace period elapsed, cancelling chefs"
            );
            self.cancel.cancel();
            for worker in pending {
                if let Err(e) = worker.await {
                    error!("Chef task failed: {:?}", e);
                }
            }
        }

        let mut discarded = 0;
        {
            let mut jobs = self.jobs.lock().await;
            while let Ok(job) = jobs.try_recv() {
                warn!(order_id = %job.order.id(), dish = job.order.dish(), "Queued order discarded");
                discarded += 1;
            }
        }
        self.counters.backlog.store(0, Ordering::SeqCst);

        let report = PoolShutdown {
            forced: !finished,
            abandoned: self.counters.abandoned.swap(0, Ordering::SeqCst),
            discarded,
        };
        info!(?report, "Kitchen closed");
        report
    }

    /// Cancels every chef at once without waiting for them.
    ///
    /// For teardown paths that cannot await [`shutdown`](Self::shutdown).
    /// In-flight and backlog orders are dropped without a report.
    pub fn abort(&self) {
        drop(self.sender.lock().take());
        if !self.cancel.is_cancelled() {
            warn!(cooking = self.cooking(), backlog = self.backlog(), "Kitchen aborted");
            self.cancel.cancel();
        }
    }

    /// Number of chefs.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Chefs currently in the middle of an order.
    pub fn cooking(&self) -> usize {
        self.counters.cooking.load(Ordering::SeqCst)
    }

    /// Submitted orders no chef has picked up yet.
    pub fn backlog(&self) -> usize {
        self.counters.backlog.load(Ordering::SeqCst)
    }

    pub fn is_accepting(&self) -> bool {
        self.sender.lock().is_some()
    }
}

enum Outcome {
    Published,
    Abandoned,
    Rejected,
}

async fn run_worker(
    chef: String,
    jobs: JobReceiver,
    store: Arc<CompletionStore>,
    counters: Arc<Counters>,
    cancel: CancellationToken,
) {
    debug!(chef = chef.as_str(), "Chef started");
    let mut cooked = 0u64;

    loop {
        let job = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            job = async { jobs.lock().await.recv().await } => job,
        };
        // `None` once the pool stopped accepting and the backlog is empty.
        let Some(job) = job else { break };

        counters.backlog.fetch_sub(1, Ordering::SeqCst);
        counters.cooking.fetch_add(1, Ordering::SeqCst);
        let outcome = cook(&chef, job, &store, &cancel).await;
        counters.cooking.fetch_sub(1, Ordering::SeqCst);

        match outcome {
            Outcome::Published => cooked += 1,
            Outcome::Abandoned => {
                counters.abandoned.fetch_add(1, Ordering::SeqCst);
            }
            Outcome::Rejected => {}
        }
    }

    debug!(chef = chef.as_str(), cooked, "Chef stopped");
}

async fn cook(chef: &str, job: Job, store: &CompletionStore, cancel: &CancellationToken) -> Outcome {
    let Job { mut order, recipe } = job;
    let order_id = order.id();

    if let Err(e) = order.start_cooking() {
        warn!(chef, %order_id, error = %e, "Order rejected by kitchen");
        return Outcome::Rejected;
    }
    info!(chef, %order_id, dish = order.dish(), "Started cooking");

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!(chef, %order_id, dish = order.dish(), "Cooking interrupted, order abandoned");
            return Outcome::Abandoned;
        }
        _ = recipe.prepare(&order) => {}
    }

    if let Err(e) = order.finish_cooking() {
        warn!(chef, %order_id, error = %e, "Order rejected by kitchen");
        return Outcome::Rejected;
    }
    let cook_ms = order.cooking_time().unwrap_or_default().as_millis() as u64;
    info!(chef, %order_id, dish = order.dish(), cook_ms, "Finished cooking");
    store.publish(order);
    Outcome::Published
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{FixedRecipe, RecordingRecipe};
    use tokio::time::timeout;

    fn chefs(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Chef {i}")).collect()
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn cooked_orders_are_published_ready() {
        let store = Arc::new(CompletionStore::new());
        let pool = WorkerPool::new(&chefs(2), Arc::clone(&store));
        let recipe: Arc<dyn Recipe> = Arc::new(FixedRecipe::new(Duration::from_millis(10)));

        let order = Order::new("Alice", "Burger", "Waiter Igor");
        let id = order.id();
        pool.submit(order, recipe).unwrap();

        wait_until(|| store.contains(id)).await;
        let order = store.try_remove(id).unwrap();
        assert_eq!(order.status(), crate::model::OrderStatus::Ready);
        assert!(order.cooking_time().unwrap() >= Duration::from_millis(10));

        let report = pool.shutdown(Duration::from_secs(1)).await;
        assert_eq!(report, PoolShutdown::default());
    }

    #[tokio::test]
    async fn backlog_waits_for_free_chef() {
        let store = Arc::new(CompletionStore::new());
        let pool = WorkerPool::new(&chefs(1), Arc::clone(&store));
        let recipe = Arc::new(RecordingRecipe::new(Duration::from_millis(20)));

        for _ in 0..3 {
            pool.submit(Order::new("Alice", "Burger", "Waiter Igor"), recipe.clone()).unwrap();
        }
        assert!(pool.backlog() >= 2);

        wait_until(|| store.len() == 3).await;
        assert_eq!(recipe.peak_concurrency(), 1);
        assert_eq!(pool.backlog(), 0);
        pool.shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn submit_after_shutdown_is_rejected() {
        let store = Arc::new(CompletionStore::new());
        let pool = WorkerPool::new(&chefs(1), Arc::clone(&store));
        pool.shutdown(Duration::from_millis(100)).await;
        assert!(!pool.is_accepting());

        let order = Order::new("Alice", "Burger", "Waiter Igor");
        let id = order.id();
        let recipe: Arc<dyn Recipe> = Arc::new(FixedRecipe::new(Duration::ZERO));
        assert_eq!(pool.submit(order, recipe), Err(PoolError::ShutDown(id)));
    }

    #[tokio::test]
    async fn graceful_shutdown_finishes_in_flight_orders() {
        let store = Arc::new(CompletionStore::new());
        let pool = WorkerPool::new(&chefs(2), Arc::clone(&store));
        let recipe: Arc<dyn Recipe> = Arc::new(FixedRecipe::new(Duration::from_millis(50)));

        pool.submit(Order::new("Alice", "Burger", "Waiter Igor"), recipe.clone()).unwrap();
        pool.submit(Order::new("Bob", "Lasagna", "Waiter Anna"), recipe).unwrap();
        wait_until(|| pool.cooking() == 2).await;

        let report = pool.shutdown(Duration::from_secs(2)).await;
        assert!(!report.forced);
        assert_eq!(report.abandoned, 0);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn forced_shutdown_abandons_in_flight_and_discards_backlog() {
        let store = Arc::new(CompletionStore::new());
        let pool = WorkerPool::new(&chefs(1), Arc::clone(&store));
        let recipe: Arc<dyn Recipe> = Arc::new(FixedRecipe::new(Duration::from_secs(30)));

        pool.submit(Order::new("Alice", "Ribeye Steak", "Waiter Igor"), recipe.clone()).unwrap();
        pool.submit(Order::new("Bob", "Ribeye Steak", "Waiter Anna"), recipe).unwrap();
        wait_until(|| pool.cooking() == 1).await;

        let started = std::time::Instant::now();
        let report = pool.shutdown(Duration::from_millis(100)).await;
        assert!(started.elapsed() < Duration::from_secs(2));

        assert_eq!(
            report,
            PoolShutdown {
                forced: true,
                abandoned: 1,
                discarded: 1,
            }
        );
        assert!(store.is_empty());
        assert_eq!(pool.cooking(), 0);
    }

    #[tokio::test]
    async fn abort_stops_chefs_without_waiting() {
        let store = Arc::new(CompletionStore::new());
        let pool = WorkerPool::new(&chefs(1), Arc::clone(&store));
        let recipe: Arc<dyn Recipe> = Arc::new(FixedRecipe::new(Duration::from_secs(30)));

        pool.submit(Order::new("Alice", "Ribeye Steak", "Waiter Igor"), recipe).unwrap();
        wait_until(|| pool.cooking() == 1).await;

        pool.abort();
        assert!(!pool.is_accepting());
        wait_until(|| pool.cooking() == 0).await;
        assert!(store.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn each_order_is_cooked_by_exactly_one_chef() {
        let store = Arc::new(CompletionStore::new());
        let pool = WorkerPool::new(&chefs(4), Arc::clone(&store));
        let recipe = Arc::new(RecordingRecipe::new(Duration::from_millis(2)));

        let mut ids = Vec::new();
        for i in 0..200 {
            let order = Order::new(format!("Guest {i}"), "Burger", "Waiter Igor");
            ids.push(order.id());
            pool.submit(order, recipe.clone()).unwrap();
        }

        wait_until(|| store.len() == 200).await;
        assert_eq!(recipe.prepared(), 200);
        assert_eq!(recipe.overlaps(), 0, "an order was prepared by two chefs at once");
        assert!(recipe.peak_concurrency() <= 4);
        for id in ids {
            assert_eq!(recipe.times_prepared(id), 1);
            assert!(store.try_remove(id).is_some());
        }

        pool.shutdown(Duration::from_secs(1)).await;
    }
}
