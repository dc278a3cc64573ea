//! Planner - provider-independent storage search
//!
//! Walks a decision matrix to lay out new storage pools across zones and
//! to grow existing pools by resizing drives or adding drives.

pub mod distribution;
pub mod update;

pub use distribution::*;
pub use update::*;
