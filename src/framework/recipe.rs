//! # The Cook Function
//!
//! [`Recipe`] is the seam between the generic [`WorkerPool`](crate::framework::WorkerPool)
//! and whatever "cooking" means. The pool owns the order lifecycle (start, finish,
//! publish, abandon on shutdown); a recipe only supplies the preparation itself.
//!
//! The production recipe is [`MenuRecipe`](crate::kitchen::MenuRecipe). Tests plug
//! in the instrumented recipes from [`mock`](crate::framework::mock).

use crate::model::Order;
use async_trait::async_trait;

#[async_trait]
pub trait Recipe: Send + Sync + 'static {
    /// Prepares `order`, which is already in the `Cooking` state.
    ///
    /// The pool races this future against its shutdown token, so an
    /// implementation only needs to be cancel-safe, not cancellation-aware.
    async fn prepare(&self, order: &Order);
}
