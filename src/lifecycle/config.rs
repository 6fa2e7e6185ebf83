//! # Restaurant Configuration
//!
//! Every tunable of the pipeline in one value. [`KitchenConfig::default`] is the
//! baseline restaurant: a 50-order queue, four chefs, four waiters, and the
//! timings the simulation was designed around.
//!
//! The struct is `serde`-enabled with `#[serde(default)]`, so a host can load a
//! partial override from any serde format and keep the defaults for the rest.
//! Tests usually start from the default and shorten the delays with the
//! `with_*` builders.

use crate::framework::DEFAULT_QUEUE_CAPACITY;
use crate::kitchen::{DEFAULT_COOK_JITTER, DEFAULT_IDLE, DEFAULT_POLL_TIMEOUT};
use crate::lifecycle::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CHEFS: [&str; 4] = ["Chef Andrew", "Cook Michael", "Cook Elena", "Cook Alex"];
const WAITERS: [&str; 4] = ["Waiter Igor", "Waiter Svetlana", "Waiter Victor", "Waiter Anna"];
const CUSTOMERS: [&str; 10] = [
    "Alexey", "Maria", "Ivan", "Olga", "Dmitry", "Ekaterina", "Sergey", "Anna", "Pavel", "Natalia",
];

/// An inclusive range of delays sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub const fn from_millis(min: u64, max: u64) -> Self {
        Self::new(Duration::from_millis(min), Duration::from_millis(max))
    }

    /// Always exactly `delay`.
    pub const fn fixed(delay: Duration) -> Self {
        Self::new(delay, delay)
    }

    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let span = (self.max - self.min).as_nanos() as u64;
        self.min + Duration::from_nanos(rand::thread_rng().gen_range(0..=span))
    }

    fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitchenConfig {
    /// Orders the kitchen queue holds before waiters have to wait.
    pub queue_capacity: usize,
    /// One worker per chef.
    pub chefs: Vec<String>,
    /// One order-taking loop per waiter.
    pub waiters: Vec<String>,
    /// Guest names waiters pick from.
    pub customers: Vec<String>,
    /// How long the dispatcher waits for an order per iteration.
    pub dispatch_poll: Duration,
    /// Pause between dispatcher iterations.
    pub dispatch_idle: Duration,
    /// How often a waiter checks the pass for its order.
    pub pickup_poll: Duration,
    /// Time a waiter spends taking an order.
    pub order_taking: DelayRange,
    /// Pause after serving before the waiter takes the next order.
    pub between_orders: DelayRange,
    /// Upper bound of the random time added to every dish.
    pub cook_jitter: Duration,
    /// How long a stopping kitchen waits for chefs before cancelling them.
    pub shutdown_grace: Duration,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            chefs: CHEFS.iter().map(|name| name.to_string()).collect(),
            waiters: WAITERS.iter().map(|name| name.to_string()).collect(),
            customers: CUSTOMERS.iter().map(|name| name.to_string()).collect(),
            dispatch_poll: DEFAULT_POLL_TIMEOUT,
            dispatch_idle: DEFAULT_IDLE,
            pickup_poll: Duration::from_millis(200),
            order_taking: DelayRange::from_millis(300, 800),
            between_orders: DelayRange::from_millis(500, 1500),
            cook_jitter: DEFAULT_COOK_JITTER,
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

impl KitchenConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if self.chefs.is_empty() {
            return Err(ConfigError::NoChefs);
        }
        if self.waiters.is_empty() {
            return Err(ConfigError::NoWaiters);
        }
        if self.customers.is_empty() {
            return Err(ConfigError::NoCustomers);
        }
        if !self.order_taking.is_valid() {
            return Err(ConfigError::InvalidRange("order_taking"));
        }
        if !self.between_orders.is_valid() {
            return Err(ConfigError::InvalidRange("between_orders"));
        }
        Ok(())
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_chefs<I, S>(mut self, chefs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chefs = chefs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_waiters<I, S>(mut self, waiters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.waiters = waiters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_customers<I, S>(mut self, customers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.customers = customers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dispatch_timing(mut self, poll: Duration, idle: Duration) -> Self {
        self.dispatch_poll = poll;
        self.dispatch_idle = idle;
        self
    }

    pub fn with_pickup_poll(mut self, poll: Duration) -> Self {
        self.pickup_poll = poll;
        self
    }

    pub fn with_order_taking(mut self, range: DelayRange) -> Self {
        self.order_taking = range;
        self
    }

    pub fn with_between_orders(mut self, range: DelayRange) -> Self {
        self.between_orders = range;
        self
    }

    pub fn with_cook_jitter(mut self, jitter: Duration) -> Self {
        self.cook_jitter = jitter;
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }
}
