//! Analysis modules.
//!
//! Grouped aggregation and summary statistics over a loaded dataset.

pub mod aggregator;

pub use aggregator::*;
