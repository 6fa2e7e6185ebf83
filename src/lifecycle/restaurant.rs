use crate::framework::{BoundedWorkQueue, CompletionStore, PoolShutdown, Recipe, WorkerPool};
use crate::kitchen::{Dispatcher, DispatcherState, DispatcherStateCell, MenuRecipe};
use crate::lifecycle::{ConfigError, KitchenConfig};
use crate::model::{Menu, OrderSummary};
use crate::waiter::{Waiter, WaiterReport, WaiterStats, WaiterTiming};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

/// The supervisor that opens and closes the whole restaurant.
///
/// `Restaurant` owns everything that outlives a single run: the order queue,
/// the pass ([`CompletionStore`]), the [`Menu`] and the cumulative submitted
/// counter. Each [`start`](Self::start) builds a fresh kitchen around them:
///
/// - a [`WorkerPool`] with one chef per configured name
/// - one [`Dispatcher`] task moving orders from the queue to the chefs
/// - one [`Waiter`] task per configured waiter
///
/// all sharing a new cancellation token.
///
/// # Shutdown order
///
/// [`stop`](Self::stop) closes the restaurant front to back:
///
/// 1. Cancels the run token and waits for the waiters and the dispatcher to exit
/// 2. Shuts the [`WorkerPool`] down (grace period, then forced)
/// 3. Drains orders still in the queue, whose waiters are gone
/// 4. Clears ready orders nobody came back for
///
/// # Example
///
/// ```ignore
/// let restaurant = Restaurant::new(KitchenConfig::default(), Menu::house())?;
/// restaurant.start().await;
/// tokio::time::sleep(Duration::from_secs(10)).await;
/// let report = restaurant.stop().await;
/// ```
pub struct Restaurant {
    config: KitchenConfig,
    queue: Arc<BoundedWorkQueue>,
    store: Arc<CompletionStore>,
    menu: Arc<Menu>,
    submitted: Arc<AtomicU64>,
    dispatcher_state: Arc<DispatcherStateCell>,
    session: tokio::sync::Mutex<Option<Session>>,
    view: RwLock<SessionView>,
}

/// Everything spawned by one `start`.
struct Session {
    cancel: CancellationToken,
    pool: Arc<WorkerPool>,
    tasks: Vec<JoinHandle<()>>,
    started_at: Instant,
}

/// What `status` reads without touching the session lock.
#[derive(Default)]
struct SessionView {
    running: bool,
    pool: Option<Arc<WorkerPool>>,
    waiters: Vec<Arc<WaiterStats>>,
}

/// Outcome of [`Restaurant::stop`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShutdownReport {
    pub kitchen: PoolShutdown,
    /// Orders left in the queue after the waiters and dispatcher stopped.
    pub drained: usize,
    /// Orders that were ready but whose waiter had already left.
    pub unclaimed: usize,
    /// Orders served during the run that just ended.
    pub served: u64,
    /// Orders handed to the kitchen since the restaurant was created.
    pub submitted: u64,
    pub uptime_ms: u64,
    pub shutdown_ms: u64,
}

/// Point-in-time view of the restaurant. Every count is advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestaurantStatus {
    pub running: bool,
    pub dispatcher: DispatcherState,
    pub queue_depth: usize,
    pub queue_capacity: usize,
    /// Orders waiting in the queue, oldest first.
    pub queued: Vec<OrderSummary>,
    pub ready: usize,
    pub cooking: usize,
    pub submitted: u64,
    pub chefs: usize,
    pub menu_size: usize,
    pub waiters: Vec<WaiterReport>,
}

impl Restaurant {
    pub fn new(config: KitchenConfig, menu: Menu) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            queue: Arc::new(BoundedWorkQueue::new(config.queue_capacity)),
            store: Arc::new(CompletionStore::new()),
            menu: Arc::new(menu),
            submitted: Arc::new(AtomicU64::new(0)),
            dispatcher_state: Arc::new(DispatcherStateCell::default()),
            session: tokio::sync::Mutex::new(None),
            view: RwLock::new(SessionView::default()),
            config,
        })
    }

    /// Opens the restaurant.
    ///
    /// Returns `true` if it was already running, in which case nothing is spawned.
    #[instrument(name = "start", skip_all)]
    pub async fn start(&self) -> bool {
        let mut session = self.session.lock().await;
        if session.is_some() {
            info!("Restaurant is already running");
            return true;
        }

        let cancel = CancellationToken::new();
        let pool = Arc::new(WorkerPool::new(&self.config.chefs, Arc::clone(&self.store)));
        let recipe: Arc<dyn Recipe> = Arc::new(MenuRecipe::new(Arc::clone(&self.menu), self.config.cook_jitter));

        let dispatcher = Dispatcher::new(Arc::clone(&self.queue), Arc::clone(&pool), recipe)
            .with_timing(self.config.dispatch_poll, self.config.dispatch_idle)
            .with_counter(Arc::clone(&self.submitted))
            .with_state(Arc::clone(&self.dispatcher_state));
        let mut tasks = vec![tokio::spawn(dispatcher.run(cancel.clone()))];

        let timing = WaiterTiming {
            order_taking: self.config.order_taking,
            between_orders: self.config.between_orders,
            pickup_poll: self.config.pickup_poll,
        };
        let mut waiters = Vec::with_capacity(self.config.waiters.len());
        for name in &self.config.waiters {
            let waiter = Waiter::new(
                name.as_str(),
                Arc::clone(&self.queue),
                Arc::clone(&self.store),
                Arc::clone(&self.menu),
                self.config.customers.clone(),
                timing,
            );
            waiters.push(waiter.stats());
            tasks.push(tokio::spawn(waiter.run(cancel.clone())));
        }

        *self.view.write() = SessionView {
            running: true,
            pool: Some(Arc::clone(&pool)),
            waiters,
        };
        *session = Some(Session {
            cancel,
            pool,
            tasks,
            started_at: Instant::now(),
        });

        info!(
            chefs = self.config.chefs.len(),
            waiters = self.config.waiters.len(),
            queue_capacity = self.queue.capacity(),
            dishes = self.menu.len(),
            "Restaurant opened"
        );
        false
    }

    /// Closes the restaurant and waits until everything has stopped.
    ///
    /// Returns `None` if it was not running.
    #[instrument(name = "stop", skip_all)]
    pub async fn stop(&self) -> Option<ShutdownReport> {
        let mut guard = self.session.lock().await;
        let Some(session) = guard.take() else {
            info!("Restaurant is not running");
            return None;
        };
        let stopping_at = Instant::now();
        info!(
            queue_depth = self.queue.len(),
            ready = self.store.len(),
            "Closing restaurant"
        );

        // Waiters and the dispatcher first, so nothing new reaches the kitchen.
        session.cancel.cancel();
        for task in session.tasks {
            if let Err(e) = task.await {
                error!("Restaurant task failed: {:?}", e);
            }
        }

        let kitchen = session.pool.shutdown(self.config.shutdown_grace).await;

        let drained = self.queue.drain().await;
        if drained > 0 {
            warn!(drained, "Orders left in the queue were dropped");
        }
        // Cooked during the grace period after their waiters had gone.
        let unclaimed = self.store.drain();
        if unclaimed > 0 {
            warn!(unclaimed, "Ready orders were never collected");
        }

        let served = {
            let mut view = self.view.write();
            view.running = false;
            view.pool = None;
            view.waiters.iter().map(|stats| stats.served()).sum()
        };

        let report = ShutdownReport {
            kitchen,
            drained,
            unclaimed,
            served,
            submitted: self.submitted.load(Ordering::SeqCst),
            uptime_ms: session.started_at.elapsed().as_millis() as u64,
            shutdown_ms: stopping_at.elapsed().as_millis() as u64,
        };
        info!(?report, "Restaurant closed");
        Some(report)
    }

    pub fn is_running(&self) -> bool {
        self.view.read().running
    }

    pub fn status(&self) -> RestaurantStatus {
        let view = self.view.read();
        RestaurantStatus {
            running: view.running,
            dispatcher: self.dispatcher_state.get(),
            queue_depth: self.queue.len(),
            queue_capacity: self.queue.capacity(),
            queued: self.queue.waiting(),
            ready: self.store.len(),
            cooking: view.pool.as_ref().map(|pool| pool.cooking()).unwrap_or(0),
            submitted: self.submitted.load(Ordering::SeqCst),
            chefs: self.config.chefs.len(),
            menu_size: self.menu.len(),
            waiters: view.waiters.iter().map(|stats| stats.report()).collect(),
        }
    }

    /// Orders on the pass, oldest first.
    pub fn ready_orders(&self) -> Vec<OrderSummary> {
        let mut ready: Vec<OrderSummary> = self.store.snapshot().collect();
        ready.sort_by_key(|summary| summary.id);
        ready
    }

    /// The live menu. Dishes added here apply to orders that start cooking afterwards.
    pub fn menu(&self) -> Arc<Menu> {
        Arc::clone(&self.menu)
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }
}

impl Drop for Restaurant {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().as_ref() {
            warn!("Restaurant dropped while running, cancelling");
            session.cancel.cancel();
            session.pool.abort();
        }
    }
}
