//! Plain data: the [`Order`] entity, its lifecycle, and the [`Menu`] of cooking times.

pub mod error;
pub mod menu;
pub mod order;

pub use error::*;
pub use menu::*;
pub use order::*;
