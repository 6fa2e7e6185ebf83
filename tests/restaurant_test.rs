use restaurant_pipeline::framework::{BoundedWorkQueue, CompletionStore, PoolShutdown, Recipe, WorkerPool};
use restaurant_pipeline::kitchen::{Dispatcher, DispatcherState, MenuRecipe};
use restaurant_pipeline::lifecycle::{ConfigError, DelayRange, KitchenConfig, Restaurant};
use restaurant_pipeline::model::{Menu, OrderStatus};
use restaurant_pipeline::waiter::{Waiter, WaiterTiming};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

fn quick_config() -> KitchenConfig {
    KitchenConfig::default()
        .with_chefs(["Chef Andrew", "Cook Elena"])
        .with_waiters(["Waiter Igor", "Waiter Anna"])
        .with_dispatch_timing(Duration::from_millis(5), Duration::from_millis(1))
        .with_pickup_poll(Duration::from_millis(5))
        .with_order_taking(DelayRange::fixed(Duration::from_millis(1)))
        .with_between_orders(DelayRange::fixed(Duration::from_millis(1)))
        .with_cook_jitter(Duration::ZERO)
        .with_shutdown_grace(Duration::from_millis(500))
}

fn quick_menu() -> Menu {
    let menu = Menu::with_default_cook_time(Duration::from_millis(10));
    menu.add_dish("Tea", 10).unwrap();
    menu.add_dish("Toast", 15).unwrap();
    menu
}

async fn wait_until(limit: Duration, check: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}

#[test]
fn invalid_config_is_rejected() {
    let result = Restaurant::new(quick_config().with_queue_capacity(0), quick_menu());
    assert!(matches!(result, Err(ConfigError::ZeroQueueCapacity)));

    let result = Restaurant::new(quick_config().with_chefs(Vec::<String>::new()), quick_menu());
    assert!(matches!(result, Err(ConfigError::NoChefs)));
}

#[tokio::test]
async fn start_is_idempotent_and_stop_reports_once() {
    let restaurant = Restaurant::new(quick_config(), quick_menu()).unwrap();
    assert!(!restaurant.is_running());
    assert!(restaurant.stop().await.is_none());

    assert!(!restaurant.start().await);
    assert!(restaurant.start().await);

    let status = restaurant.status();
    assert!(status.running);
    assert_eq!(status.waiters.len(), 2);
    assert_eq!(status.chefs, 2);
    assert_eq!(status.queue_capacity, 50);
    assert_eq!(status.waiters.len(), restaurant.config().waiters.len());
    assert_eq!(restaurant.menu().default_cook_time(), Duration::from_millis(10));

    assert!(restaurant.stop().await.is_some());
    assert!(restaurant.stop().await.is_none());
    assert!(!restaurant.is_running());
    assert_eq!(restaurant.status().dispatcher, DispatcherState::Stopped);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_waiter_gets_served() {
    let restaurant = Restaurant::new(quick_config(), quick_menu()).unwrap();
    restaurant.start().await;

    let all_served = wait_until(Duration::from_secs(5), || {
        restaurant.status().waiters.iter().all(|waiter| waiter.served >= 2)
    })
    .await;
    assert!(all_served, "waiters were not served: {:?}", restaurant.status().waiters);

    let report = restaurant.stop().await.unwrap();
    assert!(report.served >= 4);
    assert!(report.submitted >= report.served);
    assert!(!report.kitchen.forced);
    assert_eq!(report.kitchen.abandoned, 0);
    assert_eq!(restaurant.status().ready, 0);
    assert!(restaurant.status().queued.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_waiters_ordering_at_once_are_both_served() {
    let queue = Arc::new(BoundedWorkQueue::new(4));
    let store = Arc::new(CompletionStore::new());
    let menu = Arc::new(quick_menu());
    let chefs = ["Chef Andrew".to_string(), "Cook Elena".to_string()];
    let pool = Arc::new(WorkerPool::new(&chefs, Arc::clone(&store)));
    let recipe: Arc<dyn Recipe> = Arc::new(MenuRecipe::new(Arc::clone(&menu), Duration::ZERO));

    let cancel = CancellationToken::new();
    let dispatcher = Dispatcher::new(Arc::clone(&queue), Arc::clone(&pool), recipe)
        .with_timing(Duration::from_millis(5), Duration::from_millis(1));
    let submitted = dispatcher.submitted();
    let dispatching = tokio::spawn(dispatcher.run(cancel.clone()));

    let timing = WaiterTiming {
        order_taking: DelayRange::fixed(Duration::from_millis(1)),
        between_orders: DelayRange::fixed(Duration::from_millis(1)),
        pickup_poll: Duration::from_millis(5),
    };
    let waiter = |name: &str, guest: &str| {
        Waiter::new(
            name,
            Arc::clone(&queue),
            Arc::clone(&store),
            Arc::clone(&menu),
            vec![guest.to_string()],
            timing,
        )
    };
    let igor = waiter("Waiter Igor", "Maria");
    let anna = waiter("Waiter Anna", "Ivan");

    let (first, second) = timeout(Duration::from_secs(5), async {
        tokio::join!(igor.serve("Maria", "Tea", &cancel), anna.serve("Ivan", "Toast", &cancel))
    })
    .await
    .expect("orders were not served");
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_eq!(first.waiter(), "Waiter Igor");
    assert_eq!(second.waiter(), "Waiter Anna");
    assert_eq!(first.status(), OrderStatus::Ready);
    assert_eq!(second.status(), OrderStatus::Ready);
    assert_eq!(igor.stats().served(), 1);
    assert_eq!(anna.stats().served(), 1);
    assert!(store.is_empty());
    assert!(queue.is_empty());
    assert_eq!(submitted.load(Ordering::SeqCst), 2);

    cancel.cancel();
    dispatching.await.unwrap();
    assert_eq!(pool.shutdown(Duration::from_secs(1)).await, PoolShutdown::default());
}

#[tokio::test]
async fn orders_ready_after_waiters_left_are_cleared_on_stop() {
    let config = quick_config().with_shutdown_grace(Duration::from_secs(2));
    let menu = Menu::new();
    menu.add_dish("Roast", 200).unwrap();
    let restaurant = Restaurant::new(config, menu).unwrap();

    let mut unclaimed = 0;
    for _ in 0..3 {
        assert!(!restaurant.start().await);
        assert!(wait_until(Duration::from_secs(2), || restaurant.status().cooking == 2).await);

        let report = restaurant.stop().await.unwrap();
        assert!(!report.kitchen.forced);
        assert_eq!(report.kitchen.abandoned, 0);
        assert_eq!(report.served, 0);
        assert_eq!(restaurant.status().ready, 0);
        assert!(restaurant.ready_orders().is_empty());
        unclaimed += report.unclaimed;
    }
    assert_eq!(unclaimed, 6);
}

#[tokio::test]
async fn stop_is_bounded_by_the_grace_period() {
    let config = quick_config().with_shutdown_grace(Duration::from_millis(200));
    let restaurant = Restaurant::new(config, quick_menu()).unwrap();
    restaurant.start().await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let started = Instant::now();
    let report = restaurant.stop().await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(200) + Duration::from_secs(1));
    assert!(report.shutdown_ms < 1200);
}

#[tokio::test]
async fn stop_mid_cooking_abandons_the_order() {
    let config = quick_config()
        .with_chefs(["Chef Andrew"])
        .with_waiters(["Waiter Igor"])
        .with_shutdown_grace(Duration::from_millis(200));
    let menu = Menu::new();
    menu.add_dish("Slow Roast", 10_000).unwrap();

    let restaurant = Restaurant::new(config, menu).unwrap();
    restaurant.start().await;
    assert!(wait_until(Duration::from_secs(2), || restaurant.status().cooking == 1).await);

    let started = Instant::now();
    let report = restaurant.stop().await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(report.kitchen.forced);
    assert_eq!(report.kitchen.abandoned, 1);
    assert_eq!(report.served, 0);
    assert_eq!(restaurant.status().ready, 0);
    assert!(restaurant.ready_orders().is_empty());
}

#[tokio::test]
async fn dishes_added_while_running_are_ordered() {
    let restaurant = Restaurant::new(quick_config(), Menu::new()).unwrap();
    restaurant.start().await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(restaurant.status().submitted, 0);
    assert_eq!(restaurant.status().menu_size, 0);

    restaurant.menu().add_dish("Tea", 10).unwrap();
    let served = wait_until(Duration::from_secs(5), || {
        restaurant.status().waiters.iter().any(|waiter| waiter.served > 0)
    })
    .await;
    assert!(served);
    assert_eq!(restaurant.status().menu_size, 1);

    restaurant.stop().await.unwrap();
}

#[tokio::test]
async fn restaurant_can_reopen_after_stop() {
    let restaurant = Restaurant::new(quick_config(), quick_menu()).unwrap();

    restaurant.start().await;
    assert!(wait_until(Duration::from_secs(5), || restaurant.status().submitted > 0).await);
    let first = restaurant.stop().await.unwrap();
    assert_eq!(restaurant.status().queue_depth, 0);

    assert!(!restaurant.start().await);
    let status = restaurant.status();
    assert!(status.running);
    assert!(status.waiters.iter().all(|waiter| waiter.served == 0));

    assert!(wait_until(Duration::from_secs(5), || restaurant.status().submitted > first.submitted).await);
    let second = restaurant.stop().await.unwrap();
    assert!(second.submitted > first.submitted);
}
