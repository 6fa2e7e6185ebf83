//! The kitchen side of the restaurant: the [`Dispatcher`] loop that feeds the
//! chefs, and the [`MenuRecipe`] they cook with.

pub mod dispatcher;
pub mod recipe;

pub use dispatcher::*;
pub use recipe::*;
