//! Runs the baseline restaurant for a few seconds and prints what happened.

use restaurant_pipeline::lifecycle::{setup_tracing, KitchenConfig, Restaurant};
use restaurant_pipeline::model::Menu;
use std::time::Duration;
use tracing::info;

const OPEN_FOR: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let restaurant = Restaurant::new(KitchenConfig::default(), Menu::house()).map_err(|e| e.to_string())?;
    let config = restaurant.config();
    info!(
        chefs = config.chefs.len(),
        waiters = config.waiters.len(),
        queue_capacity = config.queue_capacity,
        grace_ms = config.shutdown_grace.as_millis() as u64,
        "Kitchen configured"
    );
    info!(
        default_cook_ms = restaurant.menu().default_cook_time().as_millis() as u64,
        "Unlisted dishes use the default cooking time"
    );
    for (dish, cook_time) in restaurant.menu().dishes() {
        info!(dish = dish.as_str(), cook_ms = cook_time.as_millis() as u64, "On the menu");
    }

    restaurant.start().await;
    tokio::time::sleep(OPEN_FOR / 2).await;

    restaurant
        .menu()
        .add_dish("Chef's Special", 3200)
        .map_err(|e| e.to_string())?;

    tokio::time::sleep(OPEN_FOR / 2).await;
    let status = restaurant.status();
    info!(?status, "Status before closing");
    for order in &status.queued {
        info!(order_id = %order.id, dish = order.dish.as_str(), waiter = order.waiter.as_str(), "Waiting for the kitchen");
    }
    for order in restaurant.ready_orders() {
        info!(order_id = %order.id, dish = order.dish.as_str(), "Waiting at the pass");
    }

    let report = restaurant.stop().await.ok_or("restaurant was not running")?;
    info!(
        served = report.served,
        submitted = report.submitted,
        abandoned = report.kitchen.abandoned,
        discarded = report.kitchen.discarded,
        drained = report.drained,
        unclaimed = report.unclaimed,
        "Day is over"
    );
    Ok(())
}
