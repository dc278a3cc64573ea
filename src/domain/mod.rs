//! Domain layer - request/response types and the provider port
//!
//! Adapters in [`crate::providers`] implement [`StorageManager`] on top of
//! the planner.

pub mod ports;

pub use ports::*;
