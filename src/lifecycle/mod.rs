//! Orchestration: configuration, the [`Restaurant`] supervisor and tracing setup.

pub mod config;
pub mod error;
pub mod restaurant;
pub mod tracing;

pub use config::*;
pub use error::*;
pub use restaurant::*;
pub use self::tracing::setup_tracing;
