//! The restaurant menu: dish label → base cooking time.
//!
//! The menu is shared by reference (`Arc<Menu>`) between the waiters, who pick
//! dishes from it, and the kitchen, which looks cooking times up when a chef
//! starts an order. It can be extended while the restaurant is running; a new
//! dish only affects orders that start cooking afterwards.

use crate::model::MenuError;
use dashmap::DashMap;
use rand::seq::SliceRandom;
use std::time::Duration;
use tracing::info;

/// Cooking time used for dishes the menu does not know.
pub const DEFAULT_COOK_TIME: Duration = Duration::from_millis(2000);

const HOUSE_DISHES: [(&str, u64); 12] = [
    ("Margherita Pizza", 3000),
    ("Pasta Carbonara", 2500),
    ("Ribeye Steak", 4000),
    ("Caesar Salad", 1500),
    ("Tom Yum Soup", 2000),
    ("Burger", 1800),
    ("Sushi Set", 3200),
    ("Tiramisu", 1200),
    ("Greek Salad", 1000),
    ("Lasagna", 2800),
    ("Grilled Fish", 2200),
    ("Creme Brulee", 1300),
];

#[derive(Debug)]
pub struct Menu {
    dishes: DashMap<String, Duration>,
    default_cook_time: Duration,
}

impl Menu {
    /// An empty menu using [`DEFAULT_COOK_TIME`] for unknown dishes.
    pub fn new() -> Self {
        Self::with_default_cook_time(DEFAULT_COOK_TIME)
    }

    pub fn with_default_cook_time(default_cook_time: Duration) -> Self {
        Self {
            dishes: DashMap::new(),
            default_cook_time,
        }
    }

    /// The twelve-dish house menu.
    pub fn house() -> Self {
        let menu = Self::new();
        for (label, ms) in HOUSE_DISHES {
            menu.dishes.insert(label.to_string(), Duration::from_millis(ms));
        }
        menu
    }

    /// Adds a dish, or replaces the cooking time of an existing one.
    ///
    /// `cook_time_ms` is signed because it usually comes straight from user
    /// input; zero and negative values are rejected. On error the menu is left
    /// untouched.
    pub fn add_dish(&self, label: &str, cook_time_ms: i64) -> Result<(), MenuError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(MenuError::EmptyLabel);
        }
        if cook_time_ms <= 0 {
            return Err(MenuError::NonPositiveCookTime(cook_time_ms));
        }

        let cook_time = Duration::from_millis(cook_time_ms as u64);
        let previous = self.dishes.insert(label.to_string(), cook_time);
        info!(dish = label, cook_ms = cook_time_ms, replaced = previous.is_some(), "Dish added to menu");
        Ok(())
    }

    /// Base cooking time for `dish`, falling back to the default for unknown labels.
    pub fn cook_time(&self, dish: &str) -> Duration {
        self.dishes
            .get(dish)
            .map(|entry| *entry.value())
            .unwrap_or(self.default_cook_time)
    }

    pub fn contains(&self, dish: &str) -> bool {
        self.dishes.contains_key(dish)
    }

    pub fn default_cook_time(&self) -> Duration {
        self.default_cook_time
    }

    /// All dishes sorted by label.
    pub fn dishes(&self) -> Vec<(String, Duration)> {
        let mut dishes: Vec<_> = self
            .dishes
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        dishes.sort_by(|a, b| a.0.cmp(&b.0));
        dishes
    }

    /// A uniformly random dish label, or `None` for an empty menu.
    pub fn random_dish(&self) -> Option<String> {
        let labels: Vec<String> = self.dishes.iter().map(|entry| entry.key().clone()).collect();
        labels.choose(&mut rand::thread_rng()).cloned()
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}
