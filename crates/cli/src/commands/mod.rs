//! Subcommand implementations.
//!
//! Each command writes to the given output so it can be exercised in tests.

pub mod catalog;
pub mod sales;
pub mod stats;
pub mod stock;
