//! The production cook function: the dish's base time from the menu plus random jitter.

use crate::framework::Recipe;
use crate::model::{Menu, Order};
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Upper bound of the random extra cooking time in the baseline configuration.
pub const DEFAULT_COOK_JITTER: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct MenuRecipe {
    menu: Arc<Menu>,
    jitter: Duration,
}

impl MenuRecipe {
    pub fn new(menu: Arc<Menu>, jitter: Duration) -> Self {
        Self { menu, jitter }
    }

    /// Base time for `dish` (or the menu default) plus a uniform draw from `[0, jitter]`.
    ///
    /// The menu is read when this is called, so a dish added while an order is
    /// already cooking does not change that order.
    pub fn cook_time(&self, dish: &str) -> Duration {
        self.menu.cook_time(dish) + random_jitter(self.jitter)
    }
}

fn random_jitter(max: Duration) -> Duration {
    let max_nanos = max.as_nanos() as u64;
    if max_nanos == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos(rand::thread_rng().gen_range(0..=max_nanos))
}

#[async_trait]
impl Recipe for MenuRecipe {
    async fn prepare(&self, order: &Order) {
        let cook_time = self.cook_time(order.dish());
        debug!(order_id = %order.id(), dish = order.dish(), cook_ms = cook_time.as_millis() as u64, "Cooking");
        tokio::time::sleep(cook_time).await;
    }
}
