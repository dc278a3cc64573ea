//! Storage Decision Matrix
//!
//! The decision matrix is an ordered table of drive configurations a cloud
//! provider supports. Each row bounds IOPS, drive size and drives per
//! instance for one drive type; lower priority values are preferred.

pub mod filter;
pub mod generator;
pub mod parser;
pub mod row;

pub use generator::{aws_matrix, gce_matrix};
pub use parser::MatrixParser;
pub use row::*;
